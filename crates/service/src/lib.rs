//! Service layer for the file editor.
//! - `content`: filename and content validation per supported file type.
//! - `storage`: in-memory staging and directory-backed persistence.
//! - `editor`: staged upload/fetch/create/edit/save workflow.
//! - `form_files`: direct-to-disk editing used by the form editor.

pub mod content;
pub mod editor;
pub mod errors;
pub mod form_files;
pub mod storage;
