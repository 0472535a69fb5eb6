//! Fixtures and scripted service mocks shared by the unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use profiles::{ApiResponse, ProfileUpdate, ProviderSignInRequest, RemoteUser, SignInResponse, UserProfile, UserType};

use crate::api::{ApiError, ProfileService};
use crate::context::SessionContext;
use crate::identity::{IdentityProvider, PendingRedirect, ProviderIdentity};
use crate::reconcile::{MountGuard, Reconciler};
use crate::store::{MemoryStore, SessionStore, StoreBatch, StoreError};

#[must_use]
pub fn alumno_profile() -> UserProfile {
    UserProfile {
        email: "a@b.com".into(),
        full_name: "Ana".into(),
        user_type: UserType::Alumno,
        phone: "+34 600 000 000".into(),
        skills: "Rust".into(),
        experience: "Two summers of backend work".into(),
        ..UserProfile::new("42")
    }
}

#[must_use]
pub fn empresa_profile() -> UserProfile {
    UserProfile {
        email: "hr@acme.test".into(),
        full_name: "Acme".into(),
        user_type: UserType::Empresa,
        company_name: "Acme".into(),
        company_description: "Anvils and rockets".into(),
        website: "https://acme.test".into(),
        category: "Manufacturing".into(),
        founded_year: "1949".into(),
        company_size: "51-200".into(),
        location: "Desert".into(),
        ..UserProfile::new("7")
    }
}

#[must_use]
pub fn provider_identity() -> ProviderIdentity {
    ProviderIdentity {
        provider_id: "uid-1".into(),
        email: Some("a@b.com".into()),
        display_name: Some("Ana".into()),
    }
}

/// `{success:true, usuario:{id:"42", email:"a@b.com", fullName:"Ana", tipo_usuario:"alumno"}}`
#[must_use]
pub fn ana_sign_in() -> SignInResponse {
    SignInResponse {
        success: true,
        message: "Login successful".into(),
        usuario: Some(RemoteUser {
            id: "42".into(),
            email: Some("a@b.com".into()),
            full_name: Some("Ana".into()),
            tipo_usuario: Some("alumno".into()),
            token: None,
        }),
    }
}

// =============================================================================
// MockService
// =============================================================================

/// Scripted `ProfileService`. Replies are popped in order; an exhausted queue
/// answers with a transport error.
#[derive(Default)]
pub struct MockService {
    sign_in_replies: Mutex<VecDeque<Result<SignInResponse, ApiError>>>,
    update_replies: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    pub sign_in_requests: Mutex<Vec<ProviderSignInRequest>>,
    pub updates: Mutex<Vec<ProfileUpdate>>,
    pub logs: Mutex<Vec<String>>,
    /// Unmounted while a call is in flight.
    unmount_during_call: Mutex<Option<MountGuard>>,
}

impl MockService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sign_in(self, reply: Result<SignInResponse, ApiError>) -> Self {
        self.sign_in_replies.lock().unwrap().push_back(reply);
        self
    }

    #[must_use]
    pub fn with_update(self, reply: Result<ApiResponse, ApiError>) -> Self {
        self.update_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn unmount_during_call(&self, guard: MountGuard) {
        *self.unmount_during_call.lock().unwrap() = Some(guard);
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.sign_in_requests.lock().unwrap().len() + self.updates.lock().unwrap().len() + self.logs.lock().unwrap().len()
    }

    fn fire_unmount(&self) {
        if let Some(guard) = self.unmount_during_call.lock().unwrap().as_ref() {
            guard.unmount();
        }
    }
}

fn unscripted() -> ApiError {
    ApiError::Transport("no scripted reply".into())
}

#[async_trait]
impl ProfileService for MockService {
    async fn provider_sign_in(&self, request: &ProviderSignInRequest) -> Result<SignInResponse, ApiError> {
        self.sign_in_requests.lock().unwrap().push(request.clone());
        self.fire_unmount();
        self.sign_in_replies.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ApiResponse, ApiError> {
        self.updates.lock().unwrap().push(update.clone());
        self.fire_unmount();
        self.update_replies.lock().unwrap().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn send_log(&self, entry: &str) -> Result<ApiResponse, ApiError> {
        self.logs.lock().unwrap().push(entry.to_owned());
        Ok(ApiResponse::ok("logged"))
    }
}

// =============================================================================
// ObservedStore
// =============================================================================

/// `MemoryStore` that counts reads and can be told to refuse writes.
#[derive(Default)]
pub struct ObservedStore {
    pub inner: MemoryStore,
    pub gets: AtomicUsize,
    pub snapshots: AtomicUsize,
    pub refuse_writes: AtomicBool,
}

impl SessionStore for ObservedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn snapshot(&self) -> Result<BTreeMap<String, String>, StoreError> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        self.inner.snapshot()
    }

    fn apply(&self, batch: &StoreBatch) -> Result<(), StoreError> {
        if self.refuse_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("read-only session store")));
        }
        self.inner.apply(batch)
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub struct Harness {
    pub store: MemoryStore,
    pub ctx: SessionContext,
    pub identity: Arc<PendingRedirect>,
    pub service: Arc<MockService>,
}

impl Harness {
    #[must_use]
    pub fn new(service: MockService) -> Self {
        let store = MemoryStore::new();
        let ctx = SessionContext::new(Arc::new(store.clone()));
        Self { store, ctx, identity: Arc::new(PendingRedirect::empty()), service: Arc::new(service) }
    }

    #[must_use]
    pub fn with_redirect(mut self, identity: PendingRedirect) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    #[must_use]
    pub fn reconciler(&self) -> Reconciler {
        let identity: Arc<dyn IdentityProvider> = self.identity.clone();
        let service: Arc<dyn ProfileService> = self.service.clone();
        Reconciler::new(self.ctx.clone(), identity, service)
    }

    /// A second tab of the same browser profile: clones share the store and
    /// its channel.
    #[must_use]
    pub fn other_tab(&self) -> SessionContext {
        self.ctx.clone()
    }
}
