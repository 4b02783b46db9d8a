//! Form-based editor: a single HTML page that loads and writes files directly
//! on disk. There is no staging here; every submit is persisted.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use service::{errors::ServiceError, form_files::DEFAULT_FILENAME};

use crate::errors::JsonApiError;
use crate::state::FormState;

#[derive(Debug, Default, Deserialize)]
pub struct EditorQuery {
    pub filename: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditorForm {
    pub filename: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Render the editor, preloading `?filename=` when it is an editable file.
pub async fn index(
    State(state): State<FormState>,
    Query(query): Query<EditorQuery>,
) -> Result<Html<String>, JsonApiError> {
    let filename = query.filename.unwrap_or_default();
    let content = if filename.is_empty() {
        String::new()
    } else {
        state.files.read(&filename).await?.unwrap_or_default()
    };
    let files = state.files.list().await?;
    debug!(%filename, files = files.len(), "rendering editor");
    Ok(Html(render_page(&filename, &content, &files, query.message.as_deref())))
}

/// Persist the submitted content and redirect back with a flash message.
pub async fn submit(
    State(state): State<FormState>,
    Form(form): Form<EditorForm>,
) -> Result<Redirect, JsonApiError> {
    let filename = form.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    match state.files.write(&filename, &form.content).await {
        Ok(()) => Ok(Redirect::to(&location(Some(&filename), &format!("Saved {filename}.")))),
        Err(ServiceError::UnsupportedType(_)) | Err(ServiceError::InvalidFilename(_)) => {
            debug!(%filename, "rejected form submit");
            Ok(Redirect::to(&location(None, "Unsupported file type.")))
        }
        Err(e) => Err(e.into()),
    }
}

fn location(filename: Option<&str>, message: &str) -> String {
    let mut params = Vec::with_capacity(2);
    if let Some(name) = filename {
        params.push(("filename", name));
    }
    params.push(("message", message));
    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("/?{query}"),
        Err(_) => "/".to_string(),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn render_page(filename: &str, content: &str, files: &[String], message: Option<&str>) -> String {
    let flash = message
        .map(|m| format!("<p class=\"flash\">{}</p>", escape_html(m)))
        .unwrap_or_default();
    let links: String = files
        .iter()
        .map(|name| {
            let href = serde_urlencoded::to_string([("filename", name.as_str())]).unwrap_or_default();
            format!("<li><a href=\"/?{}\">{}</a></li>", escape_html(&href), escape_html(name))
        })
        .collect();
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>File Editor</title></head>
<body>
<h1>File Editor</h1>
{flash}
<form method="post" action="/">
  <label>Filename <input type="text" name="filename" value="{filename}" placeholder="{default}"></label>
  <textarea name="content" rows="24" cols="100">{content}</textarea>
  <button type="submit">Save</button>
</form>
<h2>Files</h2>
<ul>{links}</ul>
</body>
</html>
"#,
        filename = escape_html(filename),
        default = DEFAULT_FILENAME,
        content = escape_html(content),
    )
}
