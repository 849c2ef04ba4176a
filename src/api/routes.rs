//! Observed routes and the flavours that serve them

use axum::http::Method;

use crate::domain::ServiceFlavour;

/// An observed application route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Api,
    Star,
    Trace,
    SuccessResponse,
    ClientError,
    ServerError,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Api,
        Route::Star,
        Route::Trace,
        Route::SuccessResponse,
        Route::ClientError,
        Route::ServerError,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Api => "/api",
            Self::Star => "/star",
            Self::Trace => "/trace",
            Self::SuccessResponse => "/success-response",
            Self::ClientError => "/client-error",
            Self::ServerError => "/server-error",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Star => Method::POST,
            _ => Method::GET,
        }
    }

    /// Value of the `endpoint` metric label
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Home => "homepage",
            Self::Api => "my_api",
            Self::Star => "add_star",
            Self::Trace => "trace",
            Self::SuccessResponse => "client_success_page",
            Self::ClientError => "client_error_page",
            Self::ServerError => "server_error_page",
        }
    }

    /// Routes registered for `flavour`, in registration order
    pub fn for_flavour(flavour: ServiceFlavour) -> Vec<Route> {
        let specific: &[Route] = match flavour {
            ServiceFlavour::Backend => &[Route::Home, Route::Api, Route::Star],
            ServiceFlavour::Front => &[Route::Home],
            ServiceFlavour::Trial => &[Route::Home, Route::Trace],
        };

        specific
            .iter()
            .copied()
            .chain([Route::SuccessResponse, Route::ClientError, Route::ServerError])
            .collect()
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_routes() {
        let routes = Route::for_flavour(ServiceFlavour::Backend);

        assert_eq!(routes.len(), 6);
        assert!(routes.contains(&Route::Star));
        assert!(routes.contains(&Route::Api));
        assert!(!routes.contains(&Route::Trace));
    }

    #[test]
    fn test_front_routes() {
        let routes = Route::for_flavour(ServiceFlavour::Front);

        assert_eq!(
            routes,
            vec![
                Route::Home,
                Route::SuccessResponse,
                Route::ClientError,
                Route::ServerError
            ]
        );
    }

    #[test]
    fn test_trace_only_on_trial() {
        assert!(Route::for_flavour(ServiceFlavour::Trial).contains(&Route::Trace));
        assert!(!Route::for_flavour(ServiceFlavour::Front).contains(&Route::Trace));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/star"), Some(Route::Star));
        assert_eq!(Route::from_path("/server-error"), Some(Route::ServerError));
        assert_eq!(Route::from_path("/metrics"), None);
    }

    #[test]
    fn test_star_is_post() {
        assert_eq!(Route::Star.method(), Method::POST);
        assert_eq!(Route::Trace.method(), Method::GET);
    }
}
