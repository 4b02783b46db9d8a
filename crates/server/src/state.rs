use std::sync::Arc;

use service::{editor::EditorService, form_files::FormFiles};

/// State shared by the staged JSON API handlers.
#[derive(Clone)]
pub struct AppState {
    pub editor: Arc<EditorService>,
}

/// State shared by the form editor handlers.
#[derive(Clone)]
pub struct FormState {
    pub files: Arc<FormFiles>,
}
