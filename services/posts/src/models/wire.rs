//! Response envelopes used by the posts REST API

use serde::Deserialize;

use super::Post;

/// Generic `{sucesso, mensagem?, dados?, erros?}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "sucesso")]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
    #[serde(rename = "dados", default = "Option::default")]
    pub data: Option<T>,
    #[serde(rename = "erros", default)]
    pub errors: Vec<String>,
}

/// Pagination block of a listing response
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(rename = "paginaAtual")]
    pub current_page: u32,
    #[serde(rename = "totalPaginas")]
    pub total_pages: u32,
    #[serde(rename = "totalPosts")]
    pub total_items: u64,
    #[serde(rename = "postsPorPagina", default)]
    pub page_size: Option<u32>,
}

/// Listing and search response
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope {
    #[serde(rename = "sucesso")]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
    #[serde(rename = "dados", default)]
    pub data: Vec<Post>,
    #[serde(rename = "paginacao", default)]
    pub pagination: Option<Pagination>,
    #[serde(rename = "termoBusca", default)]
    pub search_term: Option<String>,
    #[serde(rename = "erros", default)]
    pub errors: Vec<String>,
}
