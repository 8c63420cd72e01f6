//! Navigation and command guard.
//!
//! Route table:
//!   /login   Login       public
//!   /        Home        requires a session token
//!   /query   GraphQuery  requires a session token
//!
//! Unknown paths are not guarded and get the bare application title.

use thiserror::Error;
use tracing::debug;

use crate::protocol::CommandTokens;
use crate::protocol::vocab::{PUBLIC_VERBS, canonical_verb};
use crate::session::SessionStore;

pub const APP_TITLE: &str = "CycleGraph";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        name: "Login",
        requires_auth: false,
    },
    Route {
        path: "/",
        name: "Home",
        requires_auth: true,
    },
    Route {
        path: "/query",
        name: "GraphQuery",
        requires_auth: true,
    },
];

impl Route {
    pub fn title(&self) -> String {
        format!("{} - {APP_TITLE}", self.name)
    }
}

pub fn route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed { title: String },
    Redirect { to: &'static str, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("not logged in: run `cgql login` first")]
    NotAuthenticated,
}

/// Decide whether `path` may be shown for the current session.
///
/// The title is that of the requested route, even on redirect.
pub fn navigate(path: &str, session: &impl SessionStore) -> Navigation {
    let Some(route) = route(path) else {
        return Navigation::Proceed {
            title: APP_TITLE.to_string(),
        };
    };
    let title = route.title();
    if route.requires_auth && !session.has_token() {
        debug!(path, "redirecting to login");
        Navigation::Redirect {
            to: LOGIN_PATH,
            title,
        }
    } else {
        Navigation::Proceed { title }
    }
}

/// Refuse commands the interpreter would reject for lack of a token.
pub fn check_command(tokens: &CommandTokens, session: &impl SessionStore) -> Result<(), GuardError> {
    let public = tokens
        .head()
        .map(canonical_verb)
        .is_some_and(|verb| PUBLIC_VERBS.contains(&verb));
    if public || session.has_token() {
        Ok(())
    } else {
        Err(GuardError::NotAuthenticated)
    }
}
