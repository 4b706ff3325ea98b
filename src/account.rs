use uuid::Uuid;

/// Who is signed in. Sign-in itself belongs to the account provider.
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<Uuid>;
}

/// Identity fixed at startup, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity(pub Option<Uuid>);

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<Uuid> {
        self.0
    }
}
