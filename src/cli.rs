use std::io::Write;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::history::{StoreError, UserProfile};
use crate::product::NOT_SIGNED_IN;
use crate::render;
use crate::search::{SearchView, CATEGORIES};
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "nutralis",
    about = "Search, scan and compare food products from Open Food Facts"
)]
pub struct Cli {
    /// Open Food Facts v2 API root
    #[arg(long, env = "OFF_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Results requested per search page
    #[arg(long, env = "OFF_PAGE_SIZE", global = true)]
    pub page_size: Option<u32>,

    /// Signed-in user for scan history and profile commands
    #[arg(long, env = "NUTRALIS_USER_ID", global = true)]
    pub user: Option<Uuid>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look a product up by barcode and record the scan
    Product { code: String },
    /// Search products by category or name
    Search {
        query: String,
        /// Pages to load, following the result list as it grows
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show two products side by side
    Compare { code_a: String, code_b: String },
    /// First products of a home feed category
    Feed {
        #[arg(long, default_value = CATEGORIES[0])]
        category: String,
    },
    /// Products scanned by the signed-in user, newest first
    History,
    /// Show or edit the signed-in user's profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    /// Create the profile or replace it
    Set { username: String, avatar: String },
    /// Change an existing profile
    Update { username: String, avatar: String },
    Delete,
}

impl Cli {
    /// Command line values take precedence over the environment-derived config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.catalog.base_url = url.clone();
        }
        if let Some(size) = self.page_size.filter(|n| *n > 0) {
            config.catalog.page_size = size;
        }
        if self.user.is_some() {
            config.user_id = self.user;
        }
    }
}

pub async fn run(command: Command, state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Product { code } => {
            let lookup = state.product_lookup();
            lookup.fetch(&code).await;
            let snapshot = lookup.snapshot();
            match (snapshot.product, snapshot.error) {
                (Some(product), _) => write!(out, "{}", render::detail(&product))?,
                (None, Some(error)) => bail!(error),
                (None, None) => bail!("no product loaded"),
            }
        }
        Command::Search { query, pages } => {
            let session = state.search_session();
            session.submit_query(&query).await;
            for _ in 1..pages {
                let snapshot = session.snapshot();
                if snapshot.error.is_some() || !snapshot.has_more {
                    break;
                }
                session.load_more().await;
            }
            let snapshot = session.snapshot();
            match snapshot.view() {
                SearchView::NotSearched => bail!("empty query"),
                SearchView::Loading => bail!("search did not complete"),
                SearchView::Failed(error) => bail!(error.to_string()),
                SearchView::NoResults => writeln!(out, "No products match \"{query}\"")?,
                SearchView::Results { items, error } => {
                    for (i, item) in items.iter().enumerate() {
                        writeln!(out, "{}", render::summary_line(i, item))?;
                    }
                    if let Some(error) = error {
                        writeln!(out, "(stopped early: {error})")?;
                    } else if snapshot.has_more {
                        writeln!(out, "(more results available)")?;
                    }
                }
            }
        }
        Command::Compare { code_a, code_b } => {
            let session = state.comparison_session();
            session.compare(&code_a, &code_b).await;
            let snapshot = session.snapshot();
            if let Some(error) = snapshot.error {
                bail!(error);
            }
            let Some((a, b)) = snapshot.ready() else {
                bail!("comparison did not complete");
            };
            write!(out, "{}", render::comparison(a, b))?;
        }
        Command::Feed { category } => {
            let feed = state.category_feed();
            feed.select_category(&category).await;
            let snapshot = feed.snapshot();
            writeln!(out, "{}", snapshot.selected)?;
            for (i, item) in snapshot.products.iter().enumerate() {
                writeln!(out, "{}", render::summary_line(i, item))?;
            }
        }
        Command::History => {
            let user = signed_in(state)?;
            let scans = state.scans.list(user).await.context("load scan history")?;
            if scans.is_empty() {
                writeln!(out, "No scanned products yet")?;
            }
            for scan in &scans {
                writeln!(out, "{}", render::scan_line(scan))?;
            }
        }
        Command::Profile(cmd) => {
            let user = signed_in(state)?;
            match cmd {
                ProfileCommand::Show => match state.profiles.get(user).await {
                    Ok(p) => writeln!(out, "{} ({})", p.username, p.avatar)?,
                    Err(StoreError::NotFound) => writeln!(out, "No profile yet")?,
                    Err(e) => return Err(e).context("load profile"),
                },
                ProfileCommand::Set { username, avatar } => {
                    state
                        .profiles
                        .upsert(UserProfile {
                            user_id: user,
                            username,
                            avatar,
                        })
                        .await
                        .context("save profile")?;
                    writeln!(out, "Profile saved")?;
                }
                ProfileCommand::Update { username, avatar } => {
                    match state.profiles.update(user, &username, &avatar).await {
                        Ok(()) => writeln!(out, "Profile updated")?,
                        Err(StoreError::NotFound) => {
                            bail!("no profile to update; create one with `profile set`")
                        }
                        Err(e) => return Err(e).context("update profile"),
                    }
                }
                ProfileCommand::Delete => {
                    state
                        .profiles
                        .delete(user)
                        .await
                        .context("delete profile")?;
                    writeln!(out, "Profile deleted")?;
                }
            }
        }
    }
    Ok(())
}

fn signed_in(state: &AppState) -> anyhow::Result<Uuid> {
    match state.identity.current_user() {
        Some(user) => Ok(user),
        None => bail!(NOT_SIGNED_IN),
    }
}
