//! Minimal server-side HTML rendering.
//!
//! Templating proper is outside this system's scope; these helpers keep the
//! wiring small while staying escape-safe. Every interpolated user value
//! goes through [`esc`].

use citycards_core::{CityCard, User};
use std::fmt::Write as _;

/// Escapes text for safe interpolation into HTML.
pub fn esc(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps page content in the shared chrome (nav bar, auth links).
pub fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let auth_nav = match user {
        Some(user) => format!(
            r#"<span>Signed in as {}</span>
            <a href="/city/add/">Add city</a>
            <form method="post" action="/accounts/logout/" class="inline"><button>Log out</button></form>"#,
            esc(&user.username)
        ),
        None => r#"<a href="/accounts/login/">Log in</a> <a href="/signup/">Sign up</a>"#.to_string(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} | CityCards</title></head>
<body>
<nav><a href="/">CityCards</a> {auth_nav}</nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = esc(title),
    )
}

/// Listing page: search box, sort links, one row per card.
pub fn list_page(user: Option<&User>, q: &str, cards: &[CityCard]) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1>Cities</h1>
<form method="get" action="/">
  <input type="text" name="q" value="{q}" placeholder="Search by city or region">
  <button>Search</button>
</form>
<p>Sort: <a href="/?sort=pop">population</a> | <a href="/?sort=new">newest</a> | <a href="/?sort=title">title</a></p>"#,
        q = esc(q),
    );

    if cards.is_empty() {
        body.push_str("<p>No cities found.</p>");
    } else {
        body.push_str("<ul>");
        for card in cards {
            let population = card
                .population
                .map(|count| count.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let _ = write!(
                body,
                r#"<li><a href="/city/{slug}/">{title}</a> ({region}), population {population}, {views} views</li>"#,
                slug = esc(&card.slug),
                title = esc(&card.title),
                region = esc(&card.region),
                views = card.views_count,
            );
        }
        body.push_str("</ul>");
    }

    layout("Cities", user, &body)
}

/// Detail page, rendered with the already-incremented view counter.
pub fn detail_page(user: Option<&User>, card: &CityCard) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{title}</h1>\n<p>Region: {region}</p>",
        title = esc(&card.title),
        region = esc(&card.region),
    );

    if let Some(image) = card.image.as_deref() {
        let _ = write!(body, r#"<img src="/media/{}" alt="">"#, esc(image));
    }
    if let Some(population) = card.population {
        let _ = write!(body, "<p>Population: {population}</p>");
    }
    if let (Some(lat), Some(lon)) = (card.lat, card.lon) {
        let _ = write!(body, "<p>Coordinates: {lat}, {lon}</p>");
    }
    let _ = write!(
        body,
        "<p>{short}</p>\n<div>{content}</div>\n<p>{views} views</p>",
        short = esc(&card.short_description),
        content = esc(&card.content),
        views = card.views_count,
    );

    if user.is_some() {
        let _ = write!(
            body,
            r#"<p><a href="/city/{slug}/edit/">Edit</a> <a href="/city/{slug}/delete/">Delete</a></p>"#,
            slug = esc(&card.slug),
        );
    }

    layout(&card.title, user, &body)
}

/// Create/edit form. `card` fills initial values in edit mode.
pub fn card_form_page(user: Option<&User>, action: &str, card: Option<&CityCard>) -> String {
    let heading = if card.is_some() { "Edit city" } else { "Add city" };
    let value = |get: fn(&CityCard) -> &str| card.map(get).map(esc).unwrap_or_default();
    let numeric = |get: fn(&CityCard) -> Option<String>| card.and_then(get).unwrap_or_default();

    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}" enctype="multipart/form-data">
  <label>City <input type="text" name="title" value="{title}"></label>
  <label>Region <input type="text" name="region" value="{region}"></label>
  <label>Population <input type="text" name="population" value="{population}"></label>
  <label>Latitude <input type="text" name="lat" value="{lat}"></label>
  <label>Longitude <input type="text" name="lon" value="{lon}"></label>
  <label>Short description <textarea name="short_description">{short}</textarea></label>
  <label>Content <textarea name="content">{content}</textarea></label>
  <label>Image <input type="file" name="image"></label>
  <button>Save</button>
</form>"#,
        action = esc(action),
        title = value(|c| &c.title),
        region = value(|c| &c.region),
        population = numeric(|c| c.population.map(|v| v.to_string())),
        lat = numeric(|c| c.lat.map(|v| v.to_string())),
        lon = numeric(|c| c.lon.map(|v| v.to_string())),
        short = value(|c| &c.short_description),
        content = value(|c| &c.content),
    );
    layout(heading, user, &body)
}

/// Delete confirmation page.
pub fn confirm_delete_page(user: Option<&User>, card: &CityCard) -> String {
    let body = format!(
        r#"<h1>Delete {title}?</h1>
<form method="post" action="/city/{slug}/delete/">
  <button>Yes, delete</button> <a href="/city/{slug}/">Cancel</a>
</form>"#,
        title = esc(&card.title),
        slug = esc(&card.slug),
    );
    layout("Confirm delete", user, &body)
}

/// Registration form with inline validation errors.
pub fn signup_page(username: &str, errors: &[String]) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
{errors}
<form method="post" action="/signup/">
  <label>Username <input type="text" name="username" value="{username}"></label>
  <label>Password <input type="password" name="password1"></label>
  <label>Password confirmation <input type="password" name="password2"></label>
  <button>Sign up</button>
</form>"#,
        errors = error_list(errors),
        username = esc(username),
    );
    layout("Sign up", None, &body)
}

/// Login form with an optional rejection message.
pub fn login_page(username: &str, errors: &[String]) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{errors}
<form method="post" action="/accounts/login/">
  <label>Username <input type="text" name="username" value="{username}"></label>
  <label>Password <input type="password" name="password"></label>
  <button>Log in</button>
</form>"#,
        errors = error_list(errors),
        username = esc(username),
    );
    layout("Log in", None, &body)
}

pub fn not_found_page() -> String {
    layout("Not found", None, "<h1>Not found</h1><p>No such page.</p>")
}

pub fn server_error_page() -> String {
    layout(
        "Server error",
        None,
        "<h1>Server error</h1><p>Something went wrong. Try again later.</p>",
    )
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut list = String::from("<ul class=\"errors\">");
    for error in errors {
        let _ = write!(list, "<li>{}</li>", esc(error));
    }
    list.push_str("</ul>");
    list
}
