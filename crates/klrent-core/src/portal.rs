// ── Portal facade ──
//
// The entry point for consumers. Owns the API client, the current session,
// and the session store, and returns domain types from every operation.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use klrent_api::{ApiClient, AuthResponse, CepClient, FrotaFilters, RegisterRequest};

use crate::config::PortalConfig;
use crate::convert::convert_listing;
use crate::draft::ReservationDraft;
use crate::error::CoreError;
use crate::model::{
    CustomerRecord, PromoPlan, Rental, Reservation, Store, UserProfile, VehicleOffer,
};
use crate::offer_ref::OfferRef;
use crate::registration::{PostalAddress, RegistrationForm};
use crate::session::{Session, SessionKeeper, SessionStore};

/// A vehicle offer with everything needed to start a reservation.
#[derive(Debug, Clone, Serialize)]
pub struct OfferDetails {
    pub offer: VehicleOffer,
    pub stores: Vec<Store>,
    pub plans: Vec<PromoPlan>,
}

/// Cheaply cloneable handle to one portal backend.
#[derive(Clone)]
pub struct Portal {
    inner: Arc<PortalInner>,
}

struct PortalInner {
    config: PortalConfig,
    client: ApiClient,
    cep: CepClient,
    store: Option<SessionStore>,
    session: RwLock<Option<Session>>,
}

impl Portal {
    /// Build the client and restore a saved session, if any.
    ///
    /// An unreadable session file is logged and treated as logged out.
    pub fn new(config: PortalConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let client = ApiClient::new(config.url.clone(), &transport)?;
        let cep_url = match &config.cep_url {
            Some(url) => url.clone(),
            None => Url::parse(klrent_api::VIACEP_URL).map_err(klrent_api::Error::from)?,
        };
        let cep = CepClient::new(cep_url, &transport)?;
        let store = config.session_path.clone().map(SessionStore::new);

        let session = match store.as_ref().map(SessionStore::load) {
            Some(Ok(session)) => session,
            Some(Err(e)) => {
                warn!(error = %e, "ignoring unreadable session");
                None
            }
            None => None,
        };
        if let Some(session) = &session {
            client.set_token(Some(session.token.clone()));
        }

        Ok(Self {
            inner: Arc::new(PortalInner {
                config,
                client,
                cep,
                store,
                session: RwLock::new(session),
            }),
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.client.has_token()
    }

    /// The user recorded with the session, without asking the backend.
    pub fn session_user(&self) -> Option<UserProfile> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    /// Start renewing the session in the background.
    pub fn spawn_session_keeper(&self) -> SessionKeeper {
        SessionKeeper::spawn(
            self.clone(),
            self.inner.config.refresh_delay,
            self.inner.config.refresh_interval,
        )
    }

    // ── Session state ────────────────────────────────────────────────

    fn require_session(&self) -> Result<(), CoreError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(CoreError::NotLoggedIn)
        }
    }

    /// Install and persist a session.
    fn establish(&self, token: SecretString, user: Option<UserProfile>) -> Result<(), CoreError> {
        let session = Session::new(token, user);
        self.inner.client.set_token(Some(session.token.clone()));
        if let Some(store) = &self.inner.store {
            store.save(&session)?;
        }
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Drop the session from memory and disk.
    fn forget(&self) -> Result<(), CoreError> {
        self.inner.client.set_token(None);
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        match &self.inner.store {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }

    fn issued_session(&self, resp: AuthResponse) -> Result<Option<UserProfile>, CoreError> {
        let user = resp.user.clone().map(UserProfile::from);
        match resp.issued_token() {
            Some(token) => {
                self.establish(SecretString::from(token.to_owned()), user.clone())?;
                Ok(user)
            }
            None => Err(CoreError::AuthenticationFailed {
                message: resp
                    .message
                    .unwrap_or_else(|| "the portal did not issue a token".into()),
            }),
        }
    }

    // ── Authentication ───────────────────────────────────────────────

    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Option<UserProfile>, CoreError> {
        let resp = self
            .inner
            .client
            .login(email, password.expose_secret())
            .await?;
        let user = self.issued_session(resp)?;
        info!(email, "logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), CoreError> {
        self.forget()?;
        info!("logged out");
        Ok(())
    }

    /// Create a portal account and log in with it.
    pub async fn register_account(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Option<UserProfile>, CoreError> {
        let request = RegisterRequest {
            nome: name.trim().to_owned(),
            email: email.trim().to_owned(),
            senha: password.expose_secret().to_owned(),
        };
        let resp = self.inner.client.register(&request).await?;
        self.issued_session(resp)
    }

    /// Returns the backend's confirmation message, if any.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, CoreError> {
        let resp = self.inner.client.forgot_password(email.trim()).await?;
        Ok(resp.message)
    }

    /// Check the session with the backend, installing any renewed token.
    ///
    /// An authentication failure clears the session and yields
    /// [`CoreError::SessionExpired`].
    pub async fn renew_session(&self) -> Result<Option<UserProfile>, CoreError> {
        self.require_session()?;
        let resp = match self.inner.client.me().await {
            Ok(resp) => resp,
            Err(e) if e.is_auth_expired() => {
                debug!(error = %e, "session rejected");
                self.forget()?;
                return Err(CoreError::SessionExpired);
            }
            Err(e) => return Err(e.into()),
        };

        let user = resp
            .user
            .clone()
            .map(UserProfile::from)
            .or_else(|| self.session_user());
        let token = match resp.issued_token() {
            Some(token) => SecretString::from(token.to_owned()),
            None => self
                .inner
                .client
                .token()
                .ok_or(CoreError::NotLoggedIn)?,
        };
        self.establish(token, user.clone())?;
        Ok(user)
    }

    /// The logged-in user, as the backend sees it now.
    pub async fn current_user(&self) -> Result<UserProfile, CoreError> {
        self.renew_session()
            .await?
            .ok_or_else(|| CoreError::Internal("the portal did not return the user".into()))
    }

    // ── Catalog ──────────────────────────────────────────────────────

    pub async fn list_fleet(&self, filters: &FrotaFilters) -> Result<Vec<VehicleOffer>, CoreError> {
        let vehicles = self.inner.client.list_vehicles(filters).await?;
        Ok(convert_listing("vehicle", vehicles))
    }

    pub async fn fleet_categories(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.inner.client.list_categories().await?)
    }

    pub async fn fleet_brands(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.inner.client.list_brands().await?)
    }

    pub async fn list_plans(
        &self,
        group_id: u64,
        state_id: u64,
    ) -> Result<Vec<PromoPlan>, CoreError> {
        let plans = self.inner.client.list_plans(group_id, state_id).await?;
        Ok(convert_listing("plan", plans))
    }

    pub async fn list_stores(&self, state_id: u64) -> Result<Vec<Store>, CoreError> {
        let stores = self.inner.client.list_stores(state_id).await?;
        Ok(stores.into_iter().map(Store::from).collect())
    }

    /// Load an offer with its stores and plans in one go.
    pub async fn offer_details(&self, offer: OfferRef) -> Result<OfferDetails, CoreError> {
        debug!(id = offer.id, state_id = offer.state_id, "loading offer details");
        let client = &self.inner.client;
        let (vehicle, stores, plans) = tokio::try_join!(
            client.get_vehicle(offer.id, offer.state_id),
            client.list_stores(offer.state_id),
            client.list_plans(offer.id, offer.state_id),
        )?;
        Ok(OfferDetails {
            offer: VehicleOffer::try_from(vehicle)?,
            stores: stores.into_iter().map(Store::from).collect(),
            plans: convert_listing("plan", plans),
        })
    }

    /// Start a reservation draft for an offer as of `today`.
    pub async fn draft(
        &self,
        offer: OfferRef,
        today: NaiveDate,
    ) -> Result<ReservationDraft, CoreError> {
        let details = self.offer_details(offer).await?;
        Ok(ReservationDraft::new(
            details.offer,
            details.plans,
            details.stores,
            today,
        ))
    }

    // ── Reservations ─────────────────────────────────────────────────

    pub async fn reserve(&self, draft: &ReservationDraft) -> Result<Reservation, CoreError> {
        self.require_session()?;
        let request = draft.to_request(&self.inner.config.origin)?;
        let created = self.inner.client.create_reservation(&request).await?;
        let reservation = Reservation::try_from(created)?;
        info!(id = reservation.id, "reservation created");
        Ok(reservation)
    }

    pub async fn reservations(&self) -> Result<Vec<Reservation>, CoreError> {
        self.require_session()?;
        let reservations = self.inner.client.list_reservations().await?;
        Ok(convert_listing("reservation", reservations))
    }

    pub async fn my_reservations(&self) -> Result<Vec<Reservation>, CoreError> {
        self.require_session()?;
        let reservations = self.inner.client.my_reservations().await?;
        Ok(convert_listing("reservation", reservations))
    }

    pub async fn reservation(&self, id: u64) -> Result<Reservation, CoreError> {
        self.require_session()?;
        Reservation::try_from(self.inner.client.get_reservation(id).await?)
    }

    /// Cancel a reservation. A reason is required.
    pub async fn cancel_reservation(&self, id: u64, reason: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::validation("a cancellation reason is required"));
        }
        self.inner.client.cancel_reservation(id, reason).await?;
        info!(id, "reservation cancelled");
        Ok(())
    }

    // ── Rentals & documents ──────────────────────────────────────────

    pub async fn rentals(&self) -> Result<Vec<Rental>, CoreError> {
        self.require_session()?;
        let rentals = self.inner.client.list_rentals().await?;
        Ok(convert_listing("rental", rentals))
    }

    pub async fn vehicle_document_link(&self, car_id: u64) -> Result<String, CoreError> {
        self.require_session()?;
        let link = self.inner.client.vehicle_document_link(car_id).await?;
        if link.is_empty() {
            return Err(CoreError::NotFound {
                resource: format!("documents for vehicle {car_id}"),
            });
        }
        Ok(link)
    }

    // ── Customers ────────────────────────────────────────────────────

    pub async fn register_customer(
        &self,
        form: &RegistrationForm,
    ) -> Result<CustomerRecord, CoreError> {
        let request = form.to_request()?;
        let created = self.inner.client.create_customer(&request).await?;
        info!(id = created.id, kind = %form.kind, "customer registered");
        Ok(CustomerRecord::from(created))
    }

    /// Address for a CEP, or `None` when the code is incomplete or unknown.
    pub async fn lookup_address(&self, cep: &str) -> Result<Option<PostalAddress>, CoreError> {
        let found = self.inner.cep.lookup(cep).await?;
        debug!(cep, found = found.is_some(), "CEP lookup");
        Ok(found.map(PostalAddress::from))
    }
}
