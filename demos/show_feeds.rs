use github_feed::{FeedView, GitHubFeedWidgetBuilder, JsonFileHost, WidgetView};

/// Usage: show_feeds [repository-url] [issue-filter]
///
/// The configuration is kept in `github-feed-widget.json` in the temp
/// directory; pass a URL on first run. `GITHUB_TOKEN` is used when set.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let repo_url = args.next();
    let issue_filter = args.next();

    let host = JsonFileHost::new(std::env::temp_dir().join("github-feed-widget.json"));
    let mut widget = GitHubFeedWidgetBuilder::new().build(host)?;

    widget.initialize().await?;

    if let Some(url) = repo_url {
        widget.save(&url, std::env::var("GITHUB_TOKEN").ok()).await?;
    }

    if let WidgetView::Setup { error, .. } = widget.view() {
        println!("Widget is not configured yet: pass a repository URL");
        if let Some(error) = error {
            println!("  {}", error);
        }
        return Ok(());
    }

    println!("=== {} ===", widget.title());

    if let WidgetView::Commits { feed } = widget.view() {
        for commit in feed.items() {
            println!("  {} {}", commit.short_sha(), commit.summary());
            println!("         {}", commit.byline());
        }
        println!(
            "  (page {} of {}{})",
            feed.page_index(),
            feed.total_pages(),
            if feed.can_load_more() { ", more available" } else { "" }
        );
    }

    if let Some(filter) = issue_filter {
        widget.set_issue_filter(filter);
        widget.apply_issue_filter().await?;
    }

    widget.select_view(FeedView::Issues);
    match widget.view() {
        WidgetView::Issues { filter, feed } => {
            println!("\n=== Issues matching '{}' ===", filter);
            if feed.items().is_empty() {
                println!("  No issues matching filter found.");
            }
            for issue in feed.items() {
                println!("  {:?} {} ({})", issue.badge(), issue.title, issue.byline());
            }
        }
        WidgetView::Failed => println!("Failed fetching data from GitHub."),
        _ => {}
    }

    let rate_limit = widget.rate_limit().await?;
    println!(
        "\nRate limit: {}/{} core, {}/{} search",
        rate_limit.core_remaining,
        rate_limit.core_limit,
        rate_limit.search_remaining,
        rate_limit.search_limit
    );

    Ok(())
}
