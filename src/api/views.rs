//! HTML rendering for the home and redirect views
//!
//! Templates are embedded from `assets/` and filled by `%PLACEHOLDER%`
//! substitution. Every interpolated value is HTML-escaped; values that land
//! inside `<script>` are JSON-encoded.

use chrono::SecondsFormat;
use rust_embed::Embed;
use tracing::error;

use crate::client::ShortLink;
use crate::config::SiteConfig;
use crate::identity::{AuthControls, Session};
use crate::resolver::ResolveOutcome;
use crate::services::{HomeState, short_url};

#[derive(Embed)]
#[folder = "assets/"]
struct PageAssets;

/// Splits the streamed redirect page around the outcome fragment
const OUTCOME_MARKER: &str = "<!--OUTCOME-->";

fn template(name: &str) -> String {
    match PageAssets::get(name) {
        Some(file) => String::from_utf8_lossy(&file.data).into_owned(),
        None => {
            error!("Embedded template missing: {}", name);
            String::new()
        }
    }
}

/// Single-pass `%KEY%` substitution.
///
/// Substituted values are never rescanned, and `%` sequences that are not a
/// known key (CSS percentages) are left alone.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let value = after.find('%').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (end, *v))
        });

        match value {
            Some((end, v)) => {
                out.push_str(v);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JavaScript string literal that is safe inside an inline `<script>`
pub fn js_string(input: &str) -> String {
    serde_json::to_string(input)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn layout(title: &str, body: &str) -> String {
    fill(
        template("layout.html").as_str(),
        &[
            ("TITLE", escape_html(title).as_str()),
            ("STYLES", template("styles.css").as_str()),
            ("BODY", body),
        ],
    )
}

fn home_page(site: &SiteConfig, header_actions: &str, main: &str, page_script: &str) -> String {
    let body = fill(
        template("home.html").as_str(),
        &[
            ("HEADER_ACTIONS", header_actions),
            ("MAIN", main),
            ("PAGE_SCRIPT", page_script),
        ],
    );
    layout(&site.title, &body)
}

/// Home view without a session: hero card and sign-in button
pub fn render_signed_out(site: &SiteConfig, controls: &AuthControls) -> String {
    let main = fill(
        template("signed_out.html").as_str(),
        &[("SIGN_IN_URL", escape_html(&controls.sign_in_url).as_str())],
    );
    home_page(site, "", &main, "")
}

/// Home view for a signed-in user.
///
/// `origin` is `scheme://host` of the request. `reset_location` rewrites the
/// address bar to `/` after a form post.
pub fn render_signed_in(
    site: &SiteConfig,
    controls: &AuthControls,
    session: &Session,
    state: &HomeState,
    origin: &str,
    reset_location: bool,
) -> String {
    let header = fill(
        template("header_signed_in.html").as_str(),
        &[
            (
                "USER_NAME",
                escape_html(session.display_name.as_deref().unwrap_or_default()).as_str(),
            ),
            ("SIGN_OUT_URL", escape_html(&controls.sign_out_url).as_str()),
        ],
    );

    let created = match &state.created_url {
        Some(url) => fill(template("created.html").as_str(), &[("SHORT_URL", escape_html(url).as_str())]),
        None => String::new(),
    };

    let links = if state.links.is_empty() {
        template("empty_links.html")
    } else {
        state
            .links
            .iter()
            .map(|link| render_link_item(site, link, origin))
            .collect::<Vec<_>>()
            .join("")
    };

    let main = fill(
        template("signed_in.html").as_str(),
        &[
            ("DRAFT_URL", escape_html(&state.draft_url).as_str()),
            ("CREATED", created.as_str()),
            ("LINK_COUNT", state.links.len().to_string().as_str()),
            ("LINKS", links.as_str()),
        ],
    );

    let mut script = String::new();
    if reset_location {
        script.push_str("<script>history.replaceState(null, '', '/');</script>\n");
    }
    if let Some(alert) = &state.alert {
        script.push_str(&format!("<script>alert({});</script>\n", js_string(alert)));
    }

    home_page(site, &header, &main, &script)
}

fn render_link_item(site: &SiteConfig, link: &ShortLink, origin: &str) -> String {
    let code = urlencoding::encode(&link.short_code);
    let display_url = format!("{}/r/{}", site.display_domain, link.short_code);
    // UTC fallback, the page script rewrites it in the viewer's time zone
    let created_at = link
        .created_at
        .map(|t| t.format("Created %b %-d, %Y, %I:%M %p").to_string())
        .unwrap_or_default();
    let created_iso = link
        .created_at
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    fill(
        template("link_item.html").as_str(),
        &[
            ("DISPLAY_URL", escape_html(&display_url).as_str()),
            ("ORIGINAL_URL", escape_html(&link.original_url).as_str()),
            ("CREATED_AT", escape_html(&created_at).as_str()),
            ("CREATED_ISO", created_iso.as_str()),
            ("COPY_URL", escape_html(&short_url(origin, &link.short_code)).as_str()),
            ("DELETE_ACTION", escape_html(&format!("/links/{}/delete", code)).as_str()),
        ],
    )
}

/// Redirect page split around the outcome: `head` is sent as soon as the
/// request arrives, the outcome fragment follows once the lookup finishes,
/// then `tail`.
pub struct RedirectPage {
    pub head: String,
    pub tail: String,
}

pub fn render_redirect_shell(site: &SiteConfig, short_code: &str) -> RedirectPage {
    let body = fill(
        template("redirect.html").as_str(),
        &[
            ("DISPLAY_DOMAIN", escape_html(&site.display_domain).as_str()),
            ("SHORT_CODE", escape_html(short_code).as_str()),
        ],
    );
    let page = layout(&site.title, &body);

    match page.split_once(OUTCOME_MARKER) {
        Some((head, tail)) => RedirectPage {
            head: head.to_string(),
            tail: tail.to_string(),
        },
        None => RedirectPage {
            head: page,
            tail: String::new(),
        },
    }
}

/// Fragment for the terminal state: a full navigation or the not-found card
pub fn render_outcome(site: &SiteConfig, short_code: &str, outcome: Option<&ResolveOutcome>) -> String {
    match outcome {
        Some(ResolveOutcome::Navigate(target)) => fill(
            template("navigate.html").as_str(),
            &[
                ("TARGET_JS", js_string(target).as_str()),
                ("TARGET_ATTR", escape_html(target).as_str()),
            ],
        ),
        Some(ResolveOutcome::NotFound) | None => fill(
            template("not_found.html").as_str(),
            &[
                ("DISPLAY_DOMAIN", escape_html(&site.display_domain).as_str()),
                ("SHORT_CODE", escape_html(short_code).as_str()),
            ],
        ),
    }
}
