pub mod http_fetcher;
pub mod page_fetcher;
pub mod search_page;

pub use http_fetcher::*;
pub use page_fetcher::*;
pub use search_page::*;
