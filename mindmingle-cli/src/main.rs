use anyhow::{Context, bail};
use clap::{ArgMatches, Command, arg, value_parser};
use mindmingle_api::settings::Settings;
use mindmingle_api::{ApiNative, Session};
use mindmingle_frontend::{
    CardConfig, CommentOutcome, LikeOutcome, PostCard, ShareErr, ShareOutcome, ShareTarget,
};
use mindmingle_shared::{Post, PostId, SharePlatform, UserSummary};
use reqwest::Url;
use tracing::{error, trace};

/// Prints share targets instead of opening a browser or a clipboard.
struct StdoutShareTarget;

impl ShareTarget for StdoutShareTarget {
    fn open(&self, url: &Url) -> Result<(), ShareErr> {
        println!("{url}");
        Ok(())
    }

    fn copy(&self, text: &str) -> Result<(), ShareErr> {
        println!("{text}");
        Ok(())
    }
}

fn command() -> Command {
    let post = || arg!(<POST> "post id").value_parser(value_parser!(PostId));
    Command::new("mindmingle")
        .about("interact with mindmingle posts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(arg!(--"username" <USERNAME> "viewer username").global(true))
        .arg(arg!(--"token" <TOKEN> "viewer bearer token").global(true))
        .arg(arg!(--"author" <AUTHOR> "author of the post, defaults to the viewer").global(true))
        .subcommand(Command::new("likes").about("show like count").arg(post()))
        .subcommand(Command::new("like").about("toggle like").arg(post()))
        .subcommand(
            Command::new("react")
                .about("react with an emoji")
                .arg(post())
                .arg(arg!(<EMOJI>)),
        )
        .subcommand(Command::new("comments").about("list comments").arg(post()))
        .subcommand(
            Command::new("comment")
                .about("add a comment")
                .arg(post())
                .arg(arg!(<TEXT>))
                .arg(
                    arg!(--"reply" <COMMENT> "comment id to reply to")
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("share")
                .about("share a post")
                .arg(post())
                .arg(arg!(<PLATFORM> "twitter, facebook, linkedin, whatsapp or copy")),
        )
        .subcommand(Command::new("stats").about("show post counters").arg(post()))
        .subcommand(
            Command::new("delete")
                .about("delete a post, or one of its comments")
                .arg(post())
                .arg(arg!(--"comment" <COMMENT> "comment id").value_parser(value_parser!(i64))),
        )
}

fn session(matches: &ArgMatches) -> anyhow::Result<Session> {
    let username = matches.get_one::<String>("username");
    let token = matches.get_one::<String>("token");
    match (username, token) {
        (Some(username), Some(token)) => Ok(Session::logged_in(username, token)),
        (None, None) => Ok(Session::guest()),
        _ => bail!("--username and --token must be given together"),
    }
}

fn post_stub(id: PostId, matches: &ArgMatches, session: &Session) -> Post {
    let author = matches
        .get_one::<String>("author")
        .map(String::as_str)
        .or(session.username())
        .unwrap_or_default();
    Post {
        id,
        user: UserSummary::new(author, author),
        content: String::new(),
        timestamp: 0,
        file_attachment: None,
    }
}

async fn run(matches: ArgMatches) -> anyhow::Result<()> {
    let settings = Settings::new_from_file().context("failed to load settings")?;
    let Some((name, sub_matches)) = matches.subcommand() else {
        bail!("missing subcommand");
    };
    let session = session(sub_matches)?;
    let post_id = *sub_matches
        .get_one::<PostId>("POST")
        .context("missing post id")?;
    let post = post_stub(post_id, sub_matches, &session);
    let api = ApiNative::from_settings(&settings)?.with_session(session);
    trace!("running {name} for post {post_id} as {:?}", api.session);

    let card = PostCard::mount(api, post, CardConfig::from(&settings)).await;

    match name {
        "likes" => {
            let state = card.state();
            println!("{} likes, liked by you: {}", state.like_count, state.user_liked);
        }
        "like" => match card.toggle_like().await {
            LikeOutcome::Committed => {
                let state = card.state();
                println!("{} likes, liked by you: {}", state.like_count, state.user_liked);
            }
            LikeOutcome::RolledBack => bail!("like was rejected, counters resynced"),
            LikeOutcome::Skipped => bail!("like skipped, log in with --username and --token"),
        },
        "react" => {
            let emoji = sub_matches
                .get_one::<String>("EMOJI")
                .context("missing emoji")?;
            if !card.react(emoji).await {
                bail!("reaction skipped");
            }
            println!("{} likes", card.state().like_count);
        }
        "comments" => {
            card.open_comments().await;
            let state = card.state();
            if !state.comments_loaded {
                bail!("failed to load comments");
            }
            for row in state.comment_rows() {
                let indent = "  ".repeat(usize::from(row.indent));
                let comment = row.comment;
                println!(
                    "{indent}[{}] {}: {}",
                    comment.id, comment.user.username, comment.content
                );
            }
        }
        "comment" => {
            let text = sub_matches
                .get_one::<String>("TEXT")
                .context("missing text")?;
            if let Some(reply_id) = sub_matches.get_one::<i64>("reply") {
                card.open_comments().await;
                let target = card
                    .state()
                    .comments
                    .into_iter()
                    .find(|comment| comment.id == *reply_id)
                    .with_context(|| format!("comment {reply_id} not found"))?;
                card.reply_to(&target);
            }
            card.set_draft(text);
            match card.submit_comment().await {
                CommentOutcome::Submitted => println!("{} comments", card.state().comments.len()),
                outcome => bail!("comment {outcome}"),
            }
        }
        "share" => {
            let platform = sub_matches
                .get_one::<String>("PLATFORM")
                .context("missing platform")?
                .parse::<SharePlatform>()
                .context("unknown platform")?;
            match card.share(platform, &StdoutShareTarget).await {
                ShareOutcome::Recorded | ShareOutcome::Opened => {
                    println!("{} shares", card.state().share_count)
                }
                outcome => bail!("share {outcome}"),
            }
        }
        "stats" => {
            let stats = card
                .fetch_stats()
                .await
                .context("failed to fetch stats")?;
            println!(
                "{} likes, {} comments, {} shares",
                stats.like_count, stats.comment_count, stats.share_count
            );
        }
        "delete" => match sub_matches.get_one::<i64>("comment") {
            Some(comment_id) => {
                card.open_comments().await;
                match card.delete_comment(*comment_id).await {
                    CommentOutcome::Deleted => println!("comment {comment_id} deleted"),
                    outcome => bail!("delete comment {outcome}"),
                }
            }
            None => {
                if !card.delete_post().await {
                    bail!("failed to delete post {post_id}");
                }
                println!("post {post_id} deleted");
            }
        },
        name => bail!("unknown command {name}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(true)
                .with_line_number(true),
        )
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let matches = command().get_matches();
    let result = run(matches).await;
    if let Err(err) = &result {
        error!("command failed: {err:#}");
    }
    result
}
