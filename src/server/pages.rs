//! Server-rendered HTML pages.

use crate::language_utils::LanguageEntry;
use crate::translation::TranslationOutcome;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem}textarea,input[type=text]{width:100%}\
.text{white-space:pre-wrap;border:1px solid #ccc;padding:.75rem}.error{color:#b00020}";

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// The translation form
pub fn render_form(languages: &[LanguageEntry], default_target: &str) -> String {
    let options: String = languages
        .iter()
        .map(|entry| {
            let selected = if entry.code == default_target { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape_html(&entry.code),
                selected,
                escape_html(&entry.name)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Document translator</h1>
<form method="post" action="/translate">
<fieldset>
<legend>Input</legend>
<label><input type="radio" name="input_type" value="text" checked> Text</label>
<label><input type="radio" name="input_type" value="url"> Web page</label>
<label><input type="radio" name="input_type" value="pdf"> PDF on the server</label>
</fieldset>
<label>Text <textarea name="text" rows="8"></textarea></label>
<label>Web page URL <input type="text" name="web_url" placeholder="https://"></label>
<label>PDF path <input type="text" name="pdf_path"></label>
<label>Target language <select name="target_language">{}</select></label>
<p><button type="submit">Translate</button></p>
</form>"#,
        options
    );

    layout("Document translator", &body)
}

/// The result page of a successful translation
pub fn render_result(outcome: &TranslationOutcome) -> String {
    let bleu = outcome
        .bleu_score
        .map(|score| format!("<p>BLEU: {:.4}</p>\n", score))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Translation to {target}</h1>
<p>Detected language: {detected} ({detected_code}) &middot; {chunks} chunk(s)</p>
{bleu}<h2>Original</h2>
<div class="text">{original}</div>
<h2>Translated</h2>
<div class="text">{translated}</div>
<p><a href="/">Translate another document</a></p>"#,
        target = escape_html(&outcome.target_language_name),
        detected = escape_html(&outcome.detected_language_name),
        detected_code = escape_html(&outcome.detected_language),
        chunks = outcome.chunk_count,
        bleu = bleu,
        original = escape_html(&outcome.original_text),
        translated = escape_html(&outcome.translated_text),
    );

    layout("Translation", &body)
}

/// The page shown when a request fails
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Translation failed</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
        escape_html(message)
    );
    layout("Error", &body)
}
