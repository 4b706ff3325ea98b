mod feed;
mod session;
pub mod state;

pub use feed::{CategoryFeed, FeedState, CATEGORIES, FEED_LIMIT};
pub use session::SearchSession;
pub use state::{SearchState, SearchView};
