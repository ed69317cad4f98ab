//! Browser widget markup.

use crate::config::CaptchaConfig;
use crate::render::escape_html;

/// Form field carrying the challenge token.
pub const CHALLENGE_FIELD: &str = "recaptcha_challenge_field";

/// Form field carrying the user's answer.
pub const RESPONSE_FIELD: &str = "recaptcha_response_field";

/// Render the widget for a form.
///
/// `lang` is the page language; the widget localises its own labels.
pub fn widget_html(config: &CaptchaConfig, lang: &str) -> String {
    let server = escape_html(config.script_url.trim_end_matches('/'));
    let key = escape_html(&config.site_key);

    format!(
        "<script type=\"text/javascript\">var RecaptchaOptions = {{ lang : '{lang}', theme : '{theme}' }};</script>\
         <script type=\"text/javascript\" src=\"{server}/challenge?k={key}\"></script>\
         <noscript>\
         <iframe src=\"{server}/noscript?k={key}\" height=\"300\" width=\"500\" frameborder=\"0\"></iframe><br/>\
         <textarea name=\"{CHALLENGE_FIELD}\" rows=\"3\" cols=\"40\"></textarea>\
         <input type=\"hidden\" name=\"{RESPONSE_FIELD}\" value=\"manual_challenge\"/>\
         </noscript>",
        lang = js_string(lang),
        theme = js_string(&config.theme),
    )
}

/// Keep a value safe inside a single-quoted script string.
fn js_string(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}
