//! Authentication gate: settings validation, the generated `auth.js`, and
//! the login/logout pages.
//!
//! Authentication only exists in the normal render mode. Every page loads
//! the Supabase client plus `/auth.js`, which hides the page until a session
//! with access to this site is confirmed.

use crate::config::AuthConfig;
use maud::{DOCTYPE, Markup, html};
use thiserror::Error;

/// Supabase JS client, loaded before `auth.js`.
pub const SUPABASE_CDN: &str = "https://cdn.jsdelivr.net/npm/@supabase/supabase-js@2";

/// Output file name of the generated script, at the site root.
pub const AUTH_SCRIPT_FILE: &str = "auth.js";
pub const LOGIN_PAGE: &str = "login.html";
pub const LOGOUT_PAGE: &str = "logout.html";

const AUTH_TEMPLATE: &str = include_str!("../static/js/auth.js");

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("authentication is enabled but {0} not set (disable it with --no-auth)")]
    Missing(String),
    #[error("auth.supabaseUrl must be an https:// URL, got '{0}'")]
    InvalidUrl(String),
}

/// Validated credentials; only constructed through [`AuthSettings::from_config`].
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings<'a> {
    pub supabase_url: &'a str,
    pub anon_key: &'a str,
    pub site_id: &'a str,
}

impl<'a> AuthSettings<'a> {
    pub fn from_config(auth: &'a AuthConfig) -> Result<Self, AuthError> {
        let field = |v: &'a Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let url = field(&auth.supabase_url);
        let key = field(&auth.supabase_anon_key);
        let site = field(&auth.site_id);

        let missing: Vec<&str> = [
            ("auth.supabaseUrl", url.is_none()),
            ("auth.supabaseAnonKey", key.is_none()),
            ("auth.siteId", site.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (url, key, site) {
            (Some(url), Some(anon_key), Some(site_id)) => {
                if !url.starts_with("https://") {
                    return Err(AuthError::InvalidUrl(url.to_string()));
                }
                Ok(Self {
                    supabase_url: url.trim_end_matches('/'),
                    anon_key,
                    site_id,
                })
            }
            _ => Err(AuthError::Missing(missing.join(", "))),
        }
    }
}

/// `auth.js` with the site's credentials baked in as JS string literals.
pub fn auth_script(settings: &AuthSettings) -> String {
    AUTH_TEMPLATE
        .replace("__SUPABASE_URL__", &js_string(settings.supabase_url))
        .replace("__SUPABASE_ANON_KEY__", &js_string(settings.anon_key))
        .replace("__SITE_ID__", &js_string(settings.site_id))
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn auth_head(title: &str, css_href: &str) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            meta name="robots" content="noindex";
            title { (title) }
            link rel="stylesheet" href=(css_href);
            script src=(SUPABASE_CDN) {}
            script src={ "/" (AUTH_SCRIPT_FILE) } {}
        }
    }
}

/// Email + password sign-in form handled by `auth.js`.
pub fn login_page(site_name: &str, css_href: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (auth_head(&format!("Login - {site_name}"), css_href))
            body {
                div.auth-container {
                    div.auth-box {
                        h1 { "Login to " (site_name) }
                        form #login-form {
                            div.form-group {
                                label for="email" { "Email" }
                                input type="email" id="email" name="email" autocomplete="username" required;
                            }
                            div.form-group {
                                label for="password" { "Password" }
                                input type="password" id="password" name="password" autocomplete="current-password" required;
                            }
                            button.auth-button type="submit" { "Login" }
                        }
                        div #error-message.error-message {}
                    }
                }
            }
        }
    }
}

pub fn logout_page(site_name: &str, css_href: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (auth_head(&format!("Logged Out - {site_name}"), css_href))
            body {
                div.auth-container {
                    div.auth-box {
                        h1 { "You have been logged out" }
                        p { "Thank you for using " (site_name) "." }
                        a.auth-button href={ "/" (LOGIN_PAGE) } { "Login Again" }
                    }
                }
            }
        }
    }
}
