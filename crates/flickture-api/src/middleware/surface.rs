use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use flickture_core::credentials::CredentialStore;
use flickture_core::navigation::Navigator;
use flickture_core::notify::{NotificationKind, Notifier};

use super::{Middleware, Next};
use crate::error::ApiResult;
use crate::request::ApiRequest;

/// Turns a failed logical request into exactly one notification.
///
/// Sits outside the retry stage, so intermediate transient failures stay
/// quiet, and inside de-duplication, so followers of a shared request never
/// raise their own. A 401 additionally clears the stored credentials and
/// forces navigation to the login page. The error is always returned to the
/// caller after that.
pub struct SurfaceErrors {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    credentials: Arc<dyn CredentialStore>,
    login_path: String,
}

impl SurfaceErrors {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        credentials: Arc<dyn CredentialStore>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            navigator,
            credentials,
            login_path: login_path.into(),
        }
    }
}

impl Middleware for SurfaceErrors {
    fn handle(&self, request: ApiRequest, next: Next) -> BoxFuture<'static, ApiResult> {
        let notifier = self.notifier.clone();
        let navigator = self.navigator.clone();
        let credentials = self.credentials.clone();
        let login_path = self.login_path.clone();
        let method = request.method.clone();
        let path = request.path.clone();

        async move {
            let result = next.run(request).await;
            if let Err(err) = &result {
                if err.is_unauthorized() {
                    tracing::warn!(%method, %path, "Authentication rejected, clearing credentials");
                    if let Err(e) = credentials.clear() {
                        tracing::warn!(error = %e, "Failed to clear stored credentials");
                    }
                    navigator.redirect_to_login(&login_path);
                }

                if err.is_user_facing() {
                    tracing::warn!(%method, %path, error = %err, "Request failed");
                    notifier.notify(NotificationKind::Error, &err.user_message());
                }
            }
            result
        }
        .boxed()
    }
}
