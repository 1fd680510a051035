// Career recommendation: a thin gateway over an external vector index.

pub mod gateway;
pub mod handlers;
pub mod vector_index;
