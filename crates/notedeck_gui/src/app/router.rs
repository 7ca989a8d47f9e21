//! Path-to-view mapping.

/// The three screens of the client.
///
/// Routing applies no guards; each view checks the session on mount.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Route {
    Login,
    Signup,
    Dashboard,
}

impl Route {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Resolve a path; unknown paths land on the login screen.
    pub(crate) fn from_path(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/signup" | "signup" => Self::Signup,
            "/dashboard" | "dashboard" => Self::Dashboard,
            _ => Self::Login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn paths_round_trip() {
        for route in [Route::Login, Route::Signup, Route::Dashboard] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn unknown_and_trailing_slash_paths() {
        assert_eq!(Route::from_path("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("/settings"), Route::Login);
    }
}
