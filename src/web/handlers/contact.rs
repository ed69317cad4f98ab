//! Contact form handlers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::Uri,
    response::Html,
    Form, Json,
};

use crate::captcha::{CHALLENGE_FIELD, RESPONSE_FIELD};
use crate::contact::{CaptchaChallenge, SubmissionOutcome, SubmittedForm};
use crate::render::{page_document, submitted_form_id, Feedback, FormRenderer, RenderContext};
use crate::web::dto::{ApiResponse, ContactRequest, SubmissionResponse, SubmissionStatus};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

fn client_addr(connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

/// The page posts back to the URI it was served from.
fn form_action(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn render(state: &AppState, uri: &Uri, feedback: Option<Feedback<'_>>) -> Html<String> {
    let mut ctx = RenderContext::new(form_action(uri));
    let mut renderer = FormRenderer::new(&state.i18n).with_captcha(&state.captcha);
    if let Some(feedback) = feedback {
        renderer = renderer.with_feedback(feedback);
    }

    let content = renderer.render_page(&mut ctx, &state.page.body);
    Html(page_document(
        &state.page.title,
        state.i18n.locale(),
        &content,
    ))
}

/// GET /contact - Show the page with its forms.
pub async fn show_form(State(state): State<Arc<AppState>>, uri: Uri) -> Html<String> {
    render(&state, &uri, None)
}

/// POST /contact - Submit one of the page's forms.
///
/// The `submit-form-N` button name selects the form that shows the result.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    uri: Uri,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let Some(form_id) = fields.keys().find_map(|key| submitted_form_id(key)) else {
        tracing::debug!("POST without submit button, rendering page");
        return render(&state, &uri, None);
    };

    let form = SubmittedForm::from_fields(&fields);
    let challenge = CaptchaChallenge {
        client_addr: client_addr(connect_info),
        challenge: fields.get(CHALLENGE_FIELD).cloned().unwrap_or_default(),
        response: fields.get(RESPONSE_FIELD).cloned().unwrap_or_default(),
    };

    let outcome = state.service.submit(&form, Some(&challenge)).await;

    render(
        &state,
        &uri,
        Some(Feedback {
            form_id,
            form: &form,
            outcome: &outcome,
        }),
    )
}

/// POST /api/contact - Submit a form as JSON.
pub async fn submit_api(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SubmissionResponse>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let challenge = request.challenge(&client_addr(connect_info));
    let outcome = state
        .service
        .submit(&request.form, challenge.as_ref())
        .await;

    let status = match outcome {
        SubmissionOutcome::Delivered => SubmissionStatus::Sent,
        SubmissionOutcome::Skipped => SubmissionStatus::Skipped,
        SubmissionOutcome::Rejected(result) => {
            return Err(ApiError::from_validation(&result, &state.i18n));
        }
        SubmissionOutcome::DeliveryFailed => {
            return Err(ApiError::internal(state.i18n.t("error.unknown")));
        }
    };

    Ok(Json(ApiResponse::new(SubmissionResponse { status })))
}
