//! Page routing and the authentication gate.
//!
//! Maps a browser path to the screen that should render, or to a redirect
//! when the visitor's session state does not allow it.

use serde::Serialize;

use crate::value_objects::normalize_handle;

pub const SIGN_IN_PATH: &str = "/";
pub const REGISTER_PATH: &str = "/register";
pub const EDIT_PATH: &str = "/edit";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    SignIn,
    Register,
    EditProfile,
    Dashboard,
    PublicProfile { username: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    Render(Screen),
    Redirect { to: &'static str },
}

/// Decide what to show for `path`.
///
/// Authenticated visitors skip the sign-in page; anonymous visitors are sent
/// to it from the owner-only pages. Public profiles render for everyone.
pub fn resolve_route(path: &str, authenticated: bool) -> RouteDecision {
    let trimmed = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = trimmed.trim_end_matches('/');

    match trimmed {
        "" => {
            if authenticated {
                RouteDecision::Redirect { to: DASHBOARD_PATH }
            } else {
                RouteDecision::Render(Screen::SignIn)
            }
        }
        REGISTER_PATH => RouteDecision::Render(Screen::Register),
        EDIT_PATH | DASHBOARD_PATH if !authenticated => {
            RouteDecision::Redirect { to: SIGN_IN_PATH }
        }
        EDIT_PATH => RouteDecision::Render(Screen::EditProfile),
        DASHBOARD_PATH => RouteDecision::Render(Screen::Dashboard),
        other => match other.strip_prefix('/') {
            Some(segment) if !segment.is_empty() && !segment.contains('/') => {
                RouteDecision::Render(Screen::PublicProfile {
                    username: normalize_handle(segment),
                })
            }
            _ => RouteDecision::Render(Screen::NotFound),
        },
    }
}
