//! City card handlers: listing, detail, create, edit, delete.
//!
//! Create/edit/delete require an authenticated user; anonymous requests
//! are redirected to the login page. There is deliberately no ownership
//! check beyond authentication.

use crate::handlers::{lock_conn, parse_optional, PageError};
use crate::state::AppState;
use crate::{media, render, session};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use citycards_core::{CardChanges, CardDraft, CardService, SqliteCardRepository};
use serde::Deserialize;

const LOGIN_PATH: &str = "/accounts/login/";

/// `GET /` query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// GET `/`: listing with optional search text and sort key.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    let user = session::current_user(&state, &headers)?;
    let conn = lock_conn(&state)?;
    let service = CardService::new(SqliteCardRepository::new(&conn));
    let cards = service.list_cards(params.q.as_deref(), params.sort.as_deref())?;
    Ok(Html(render::list_page(
        user.as_ref(),
        params.q.as_deref().unwrap_or(""),
        &cards,
    )))
}

/// GET `/city/:slug/`: detail view; counts one view as a side effect.
pub async fn detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    let user = session::current_user(&state, &headers)?;
    let conn = lock_conn(&state)?;
    let service = CardService::new(SqliteCardRepository::new(&conn));
    let card = service.view_card(&slug)?;
    log::debug!(
        "event=card_view module=web status=ok slug={slug} views={}",
        card.views_count
    );
    Ok(Html(render::detail_page(user.as_ref(), &card)))
}

/// GET `/city/add/`: create form.
pub async fn add_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };
    Ok(Html(render::card_form_page(Some(&user), "/city/add/", None)).into_response())
}

/// POST `/city/add/`: multipart create; redirects to the new detail page.
pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let form = read_card_form(multipart).await?;
    let image = store_upload(&state, form.image.as_ref())?;

    let slug = {
        let conn = lock_conn(&state)?;
        let service = CardService::new(SqliteCardRepository::new(&conn));
        let created = match service.create_card(CardDraft {
            title: form.title,
            region: form.region,
            short_description: form.short_description,
            content: form.content,
            population: form.population,
            lat: form.lat,
            lon: form.lon,
            image: image.clone(),
            author_id: user.id,
        }) {
            Ok(card) => card,
            Err(err) => {
                // The card row never landed; drop the stored upload with it.
                if let Some(stored) = image.as_deref() {
                    media::discard_image(&state.media_dir, stored);
                }
                return Err(err.into());
            }
        };
        log::info!(
            "event=card_create module=web status=ok slug={} user_id={}",
            created.slug,
            user.id
        );
        created.slug
    };

    Ok(Redirect::to(&format!("/city/{slug}/")).into_response())
}

/// GET `/city/:slug/edit/`: edit form prefilled with stored values.
pub async fn edit_form_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let conn = lock_conn(&state)?;
    let service = CardService::new(SqliteCardRepository::new(&conn));
    let card = service.get_card(&slug)?.ok_or(PageError::NotFound)?;
    let action = format!("/city/{}/edit/", card.slug);
    Ok(Html(render::card_form_page(Some(&user), &action, Some(&card))).into_response())
}

/// POST `/city/:slug/edit/`: multipart update; an omitted image keeps the
/// stored one, and the slug never changes here.
pub async fn edit_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let form = read_card_form(multipart).await?;

    let final_slug = {
        let conn = lock_conn(&state)?;
        let service = CardService::new(SqliteCardRepository::new(&conn));
        // Resolve the slug before touching the media dir so a miss never
        // leaves an orphaned upload behind.
        if service.get_card(&slug)?.is_none() {
            return Err(PageError::NotFound);
        }
        let image = store_upload(&state, form.image.as_ref())?;
        let updated = service.update_card(
            &slug,
            CardChanges {
                title: form.title,
                region: form.region,
                short_description: form.short_description,
                content: form.content,
                population: form.population,
                lat: form.lat,
                lon: form.lon,
                image,
            },
        )?;
        log::info!(
            "event=card_update module=web status=ok slug={} user_id={}",
            updated.slug,
            user.id
        );
        updated.slug
    };

    Ok(Redirect::to(&format!("/city/{final_slug}/")).into_response())
}

/// GET `/city/:slug/delete/`: confirmation page.
pub async fn delete_confirm_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let conn = lock_conn(&state)?;
    let service = CardService::new(SqliteCardRepository::new(&conn));
    let card = service.get_card(&slug)?.ok_or(PageError::NotFound)?;
    Ok(Html(render::confirm_delete_page(Some(&user), &card)).into_response())
}

/// POST `/city/:slug/delete/`: removes the card, back to the listing.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let Some(user) = session::current_user(&state, &headers)? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    {
        let conn = lock_conn(&state)?;
        let service = CardService::new(SqliteCardRepository::new(&conn));
        service.delete_card(&slug)?;
    }
    log::info!(
        "event=card_delete module=web status=ok slug={slug} user_id={}",
        user.id
    );
    Ok(Redirect::to("/").into_response())
}

/// Decoded multipart card form.
struct CardForm {
    title: String,
    region: String,
    short_description: String,
    content: String,
    population: Option<u32>,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Uploaded file as (original name, bytes); empty uploads count as
    /// omitted.
    image: Option<(String, Vec<u8>)>,
}

async fn read_card_form(mut multipart: Multipart) -> Result<CardForm, PageError> {
    let mut title = String::new();
    let mut region = String::new();
    let mut short_description = String::new();
    let mut content = String::new();
    let mut population = None;
    let mut lat = None;
    let mut lon = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| PageError::Internal(format!("multipart read failed: {err}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let original_name = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| PageError::Internal(format!("upload read failed: {err}")))?;
            if !bytes.is_empty() {
                image = Some((original_name, bytes.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| PageError::Internal(format!("form field read failed: {err}")))?;
        match name.as_str() {
            "title" => title = value,
            "region" => region = value,
            "short_description" => short_description = value,
            "content" => content = value,
            "population" => population = parse_optional(Some(value.as_str())),
            "lat" => lat = parse_optional(Some(value.as_str())),
            "lon" => lon = parse_optional(Some(value.as_str())),
            _ => {}
        }
    }

    Ok(CardForm {
        title,
        region,
        short_description,
        content,
        population,
        lat,
        lon,
        image,
    })
}

fn store_upload(
    state: &AppState,
    upload: Option<&(String, Vec<u8>)>,
) -> Result<Option<String>, PageError> {
    match upload {
        Some((original_name, bytes)) => {
            media::save_image(&state.media_dir, original_name, bytes).map(Some)
        }
        None => Ok(None),
    }
}
