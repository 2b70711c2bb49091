use flickture_api::types::{
    CommentDraft, CommentQuery, FollowState, ListDraft, MediaType, RegisterRequest, WatchStatus,
};
use flickture_api::ApiClient;

use crate::args::{
    Command, CommentSubcommand, FavoriteSubcommand, FollowSubcommand, ListsSubcommand, MediaFlag,
    WatchlistSubcommand,
};
use crate::print;
use crate::CliError;

impl MediaFlag {
    fn media_type(self) -> Option<MediaType> {
        Some(if self.tv { MediaType::Tv } else { MediaType::Movie })
    }
}

pub async fn run(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let resp = client.auth().login(&username, &password).await?;
            let name = resp.user.map(|u| u.username).unwrap_or(username);
            println!("Signed in as {name}");
        }
        Command::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            client.auth().register(&request).await?;
            println!("Welcome, {}", request.username);
        }
        Command::Logout => {
            client.auth().logout()?;
            println!("Signed out");
        }
        Command::Whoami => {
            require_login(client)?;
            match client.auth().check_auth().await? {
                Some(user) => println!("{} (id {})", user.username, user.id),
                None => return Err(CliError::NotLoggedIn),
            }
        }
        Command::Search { query, all } => {
            if query.trim().is_empty() {
                return Err(CliError::InvalidArgument("search query is empty".into()));
            }
            if all {
                for hit in client.catalog().search_multi(&query).await? {
                    let kind = hit.get("media_type").and_then(|v| v.as_str()).unwrap_or("?");
                    let name = hit
                        .get("title")
                        .or_else(|| hit.get("name"))
                        .and_then(|v| v.as_str())
                        .unwrap_or("(untitled)");
                    let id = hit.get("id").and_then(|v| v.as_u64()).unwrap_or_default();
                    println!("{id:>8}  {name} [{kind}]");
                }
            } else {
                let results = client.catalog().search(&query).await?;
                if results.is_empty() {
                    println!("No results for \"{}\"", query.trim());
                }
                for title in &results {
                    println!("{}", print::title_line(title));
                }
            }
        }
        Command::Movie { tmdb_id } => {
            let detail = client.catalog().movie_detail(tmdb_id).await?;
            println!("{}", print::movie_summary(&detail));
        }
        Command::Discover { category } => {
            let page = client.catalog().discover(category).await?;
            for title in &page.results {
                println!("{}", print::title_line(title));
            }
        }
        Command::Watchlist(cmd) => watchlist(client, cmd.command).await?,
        Command::Favorite(cmd) => {
            require_login(client)?;
            match cmd.command {
                FavoriteSubcommand::Add { tmdb_id, media } => {
                    client.favorites().add(tmdb_id, media.media_type()).await?;
                    println!("Added {tmdb_id} to favorites");
                }
                FavoriteSubcommand::Remove { tmdb_id } => {
                    client.favorites().remove(tmdb_id).await?;
                    println!("Removed {tmdb_id} from favorites");
                }
            }
        }
        Command::Lists(cmd) => lists(client, cmd.command).await?,
        Command::Follow(cmd) => {
            require_login(client)?;
            match cmd.command {
                FollowSubcommand::User { username } => {
                    let toggle = client.social().toggle_follow_user(&username).await?;
                    match toggle.status {
                        FollowState::Followed => println!("Following {username}"),
                        FollowState::Unfollowed => println!("Unfollowed {username}"),
                    }
                }
                FollowSubcommand::Person { person_id, undo } => {
                    if undo {
                        client.social().unfollow_person(person_id).await?;
                        println!("Unfollowed {person_id}");
                    } else {
                        let state = client.social().follow_person(person_id).await?;
                        match state.followers_count {
                            Some(n) => println!("Following {person_id} ({n} followers)"),
                            None => println!("Following {person_id}"),
                        }
                    }
                }
            }
        }
        Command::Comment(cmd) => comments(client, cmd.command).await?,
    }
    Ok(())
}

async fn watchlist(client: &ApiClient, command: WatchlistSubcommand) -> Result<(), CliError> {
    require_login(client)?;
    let api = client.watchlist();
    match command {
        WatchlistSubcommand::Add { tmdb_id, media } => {
            api.add(tmdb_id, WatchStatus::Watchlist, media.media_type())
                .await?;
            println!("Added {tmdb_id} to watchlist");
        }
        WatchlistSubcommand::Watched { tmdb_id, media } => {
            api.add(tmdb_id, WatchStatus::Watched, media.media_type())
                .await?;
            println!("Marked {tmdb_id} as watched");
        }
        WatchlistSubcommand::Remove { tmdb_id } => {
            api.remove(tmdb_id).await?;
            println!("Removed {tmdb_id}");
        }
        WatchlistSubcommand::List { watched } => {
            let wanted = if watched {
                WatchStatus::Watched
            } else {
                WatchStatus::Watchlist
            };
            for entry in api.mine().await?.iter().filter(|e| e.status == wanted) {
                println!("{}", print::watchlist_line(entry));
            }
        }
    }
    Ok(())
}

async fn lists(client: &ApiClient, command: ListsSubcommand) -> Result<(), CliError> {
    let api = client.lists();
    match command {
        ListsSubcommand::Mine => {
            require_login(client)?;
            for list in &api.mine().await? {
                println!("{}", print::list_line(list));
            }
        }
        ListsSubcommand::Featured => {
            for list in &api.featured().await? {
                println!("{}", print::list_line(list));
            }
        }
        ListsSubcommand::Community => {
            for list in &api.community().await? {
                println!("{}", print::list_line(list));
            }
        }
        ListsSubcommand::Show { list_id } => {
            let list = api.get(list_id).await?;
            println!("{}", print::list_line(&list));
            if let Some(description) = list.description.as_deref().filter(|d| !d.is_empty()) {
                println!("{description}");
            }
            for title in &list.movies {
                println!("{}", print::title_line(title));
            }
        }
        ListsSubcommand::Create {
            name,
            description,
            titles,
        } => {
            require_login(client)?;
            if name.trim().is_empty() {
                return Err(CliError::InvalidArgument("list name is empty".into()));
            }
            let list = api
                .create(&ListDraft {
                    name,
                    description,
                    movie_ids: titles,
                })
                .await?;
            println!("Created list {} ({})", list.name, list.id);
        }
        ListsSubcommand::Like { list_id } => {
            require_login(client)?;
            let toggle = api.toggle_like(list_id).await?;
            println!("{}", if toggle.liked { "Liked" } else { "Like removed" });
        }
        ListsSubcommand::Add {
            list_id,
            tmdb_id,
            media,
        } => {
            require_login(client)?;
            api.add_title(list_id, tmdb_id, media.media_type()).await?;
            println!("Added {tmdb_id} to list {list_id}");
        }
        ListsSubcommand::Remove {
            list_id,
            tmdb_id,
            media,
        } => {
            require_login(client)?;
            api.remove_title(list_id, tmdb_id, media.media_type())
                .await?;
            println!("Removed {tmdb_id} from list {list_id}");
        }
    }
    Ok(())
}

async fn comments(client: &ApiClient, command: CommentSubcommand) -> Result<(), CliError> {
    let api = client.comments();
    match command {
        CommentSubcommand::List {
            movie_id,
            page,
            rating,
        } => {
            let query = CommentQuery {
                page,
                rating,
                sort_by: None,
            };
            let page = api.movie_comments(movie_id, &query).await?;
            if page.results.is_empty() {
                println!("No comments yet");
            }
            for comment in &page.results {
                println!("{}", print::comment_block(comment));
            }
            if page.has_next() {
                println!("(more on page {})", query.page + 1);
            }
        }
        CommentSubcommand::Post {
            movie_id,
            rating,
            text,
        } => {
            require_login(client)?;
            let draft = CommentDraft {
                content: text,
                rating,
                ..Default::default()
            };
            let comment = api.post_movie_comment(movie_id, &draft).await?;
            println!("Posted comment #{}", comment.id);
        }
        CommentSubcommand::Like {
            movie_id,
            comment_id,
        } => {
            require_login(client)?;
            let toggle = api.toggle_like(movie_id, comment_id).await?;
            println!("{}", if toggle.liked { "Liked" } else { "Like removed" });
        }
    }
    Ok(())
}

fn require_login(client: &ApiClient) -> Result<(), CliError> {
    if client.credentials().token().is_some() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}
