pub mod document_impl;
pub mod markup;
