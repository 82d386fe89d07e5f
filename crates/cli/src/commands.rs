//! CLI commands

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use foreigneye_client::types::{
    ArticleQuery, ArticleSort, CollectionQuery, CollectionSort, LoginRequest, RegisterRequest,
    SortOrder,
};
use foreigneye_client::{ApiClient, ClientError};
use tracing::info;

use crate::output;

pub const SESSION_EXPIRED_NOTICE: &str =
    "Your session has expired, please log in again with `foreigneye login`";

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Must repeat --password exactly
        #[arg(long)]
        password_confirm: String,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Browse articles
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },

    /// Add a concept to your collection
    Collect { concept_id: i64 },

    /// Manage your concept collection
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Look up concepts
    Concepts {
        #[command(subcommand)]
        command: ConceptCommands,
    },

    /// Find articles mentioning all of the given concepts
    Search {
        #[arg(required = true)]
        concepts: Vec<String>,
    },

    /// Show your knowledge map
    Map,
}

#[derive(Subcommand)]
pub enum ArticleCommands {
    /// List articles, newest first by default
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long, value_enum, default_value_t = ArticleSortArg::CreatedAt)]
        sort: ArticleSortArg,

        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
    },

    /// Show an article with its concept graph
    Show { article_id: i64 },
}

#[derive(Subcommand)]
pub enum CollectionCommands {
    /// List collected concepts
    List {
        #[arg(long, value_enum)]
        sort: Option<CollectionSortArg>,

        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },

    /// Remove a concept from the collection
    Remove { concept_id: i64 },
}

#[derive(Subcommand)]
pub enum ConceptCommands {
    /// Show a concept with related articles and concepts
    Show { concept_id: i64 },

    /// Search concepts by name
    Search {
        query: String,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ArticleSortArg {
    CreatedAt,
    Title,
}

impl From<ArticleSortArg> for ArticleSort {
    fn from(arg: ArticleSortArg) -> Self {
        match arg {
            ArticleSortArg::CreatedAt => Self::CreatedAt,
            ArticleSortArg::Title => Self::Title,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CollectionSortArg {
    CollectedAt,
    Name,
}

impl From<CollectionSortArg> for CollectionSort {
    fn from(arg: CollectionSortArg) -> Self {
        match arg {
            CollectionSortArg::CollectedAt => Self::CollectedAt,
            CollectionSortArg::Name => Self::Name,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}

impl Commands {
    pub async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::Register {
                username,
                email,
                password,
                password_confirm,
            } => {
                let auth = client
                    .register(RegisterRequest {
                        username,
                        email,
                        password,
                        password_confirm,
                    })
                    .await?;
                println!("Welcome, {}!", auth.user.username);
            }
            Self::Login { username, password } => {
                let auth = client.login(LoginRequest { username, password }).await?;
                println!(
                    "{}",
                    auth.message
                        .unwrap_or_else(|| format!("Logged in as {}", auth.user.username))
                );
            }
            Self::Logout => {
                client.logout().await?;
                println!("Logged out.");
            }
            Self::Whoami => match client.restore_session().await? {
                Some(user) => println!("{}", output::user(&user)),
                None => println!("Not logged in. Run `foreigneye login`."),
            },
            Self::Articles { command } => command.execute(client).await?,
            Self::Collect { concept_id } => {
                let collected = client.collect_concept(concept_id).await?;
                println!("Collected {}", collected.concept_name);
                for connection in &collected.new_connections {
                    println!(
                        "  new connection: {} ({:.2})",
                        connection.name, connection.strength
                    );
                }
            }
            Self::Collection { command } => command.execute(client).await?,
            Self::Concepts { command } => command.execute(client).await?,
            Self::Search { concepts } => {
                let results = if let [name] = concepts.as_slice() {
                    client.articles_by_concept(name).await?
                } else {
                    client.articles_by_concepts(&concepts).await?
                };
                println!("{}", output::article_search(&results));
            }
            Self::Map => {
                let map = client.knowledge_map().await?;
                println!("{}", output::knowledge_map(&map));
            }
        }
        Ok(())
    }
}

impl ArticleCommands {
    pub async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List {
                page,
                limit,
                sort,
                order,
            } => {
                let query = ArticleQuery {
                    page,
                    limit,
                    sort: sort.into(),
                    order: order.into(),
                };
                let articles = client.list_articles(&query).await?;
                info!(
                    page = articles.pagination.current_page,
                    total = articles.pagination.total_items,
                    "Fetched articles"
                );
                println!("{}", output::article_list(&articles));
            }
            Self::Show { article_id } => {
                let detail = client.get_article(article_id).await?;
                println!("{}", output::article_detail(&detail));
            }
        }
        Ok(())
    }
}

impl CollectionCommands {
    pub async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List { sort, order } => {
                let query = CollectionQuery {
                    sort: sort.map(Into::into),
                    order: order.map(Into::into),
                };
                let collection = client.list_collection(&query).await?;
                println!("{}", output::collection(&collection));
            }
            Self::Remove { concept_id } => {
                client.remove_concept(concept_id).await?;
                println!("Removed concept #{concept_id} from your collection.");
            }
        }
        Ok(())
    }
}

impl ConceptCommands {
    pub async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::Show { concept_id } => {
                let concept = client.get_concept(concept_id).await?;
                println!("{}", output::concept_detail(&concept));
            }
            Self::Search { query, limit } => {
                let results = client.search_concepts(&query, limit).await?;
                println!("{}", output::concept_search(&results));
            }
        }
        Ok(())
    }
}

/// One-line message shown to the user for a failed command
pub fn notification(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ClientError>() {
        Some(e) if e.is_auth_expired() => SESSION_EXPIRED_NOTICE.to_string(),
        Some(ClientError::Validation(e)) => e.to_string(),
        Some(e) => e
            .server_message()
            .map_or_else(|| e.to_string(), ToString::to_string),
        None => format!("{error:#}"),
    }
}
