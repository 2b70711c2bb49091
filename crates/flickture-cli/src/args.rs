use clap::{Args, Parser, Subcommand};

use flickture_api::endpoints::catalog::Category;

#[derive(Parser, Debug)]
#[command(name = "flickture", version, about = "Track movies and shows on Flickture")]
pub struct Cli {
    /// API base URL. Overrides the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        username: String,
        #[arg(long, env = "FLICKTURE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLICKTURE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Search movies by title.
    Search {
        query: String,
        /// Include TV shows and people.
        #[arg(long)]
        all: bool,
    },
    /// Show one movie by TMDB id.
    Movie { tmdb_id: u64 },
    /// Browse a curated feed.
    Discover {
        #[arg(default_value = "popular")]
        category: Category,
    },
    Watchlist(WatchlistCommand),
    Favorite(FavoriteCommand),
    Lists(ListsCommand),
    Follow(FollowCommand),
    Comment(CommentCommand),
}

/// Selects TV instead of movie for title-scoped commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct MediaFlag {
    #[arg(long)]
    pub tv: bool,
}

#[derive(Args, Debug)]
pub struct WatchlistCommand {
    #[command(subcommand)]
    pub command: WatchlistSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WatchlistSubcommand {
    /// Add a title to the watchlist.
    Add {
        tmdb_id: u64,
        #[command(flatten)]
        media: MediaFlag,
    },
    /// Mark a title as watched.
    Watched {
        tmdb_id: u64,
        #[command(flatten)]
        media: MediaFlag,
    },
    Remove { tmdb_id: u64 },
    List {
        /// Only show watched titles.
        #[arg(long)]
        watched: bool,
    },
}

#[derive(Args, Debug)]
pub struct FavoriteCommand {
    #[command(subcommand)]
    pub command: FavoriteSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FavoriteSubcommand {
    Add {
        tmdb_id: u64,
        #[command(flatten)]
        media: MediaFlag,
    },
    Remove { tmdb_id: u64 },
}

#[derive(Args, Debug)]
pub struct ListsCommand {
    #[command(subcommand)]
    pub command: ListsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ListsSubcommand {
    Mine,
    Featured,
    Community,
    Show { list_id: u64 },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// TMDB ids to start the list with.
        #[arg(long = "title", value_name = "TMDB_ID")]
        titles: Vec<u64>,
    },
    /// Like a list, or remove the like.
    Like { list_id: u64 },
    Add {
        list_id: u64,
        tmdb_id: u64,
        #[command(flatten)]
        media: MediaFlag,
    },
    Remove {
        list_id: u64,
        tmdb_id: u64,
        #[command(flatten)]
        media: MediaFlag,
    },
}

#[derive(Args, Debug)]
pub struct FollowCommand {
    #[command(subcommand)]
    pub command: FollowSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FollowSubcommand {
    /// Follow a user, or unfollow if already following.
    User { username: String },
    /// Follow an actor or crew member.
    Person {
        person_id: u64,
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// Show comments on a movie.
    List {
        movie_id: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Review a movie.
    Post {
        movie_id: u64,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        text: String,
    },
    Like { movie_id: u64, comment_id: u64 },
}
