//! Terminal front end over the feed, authoring and playback controllers.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use pratik_core::DomainError;
use pratik_core::authoring::{Authoring, PostForm};
use pratik_core::carousel::Carousel;
use pratik_core::domain::{Post, PostId};
use pratik_core::feed::{Feed, FeedStatus, LoadOutcome, SkipReason};
use pratik_core::playback::{PlaybackConfig, PlaybackSession, PlaybackState, ToggleOutcome};
use pratik_core::ports::{
    AudioOutputFactory, ColorSchemeProbe, ContentGenerator, ImageGenerator, PostStore,
    PreferenceStore, SpeechSynthesizer,
};
use pratik_core::theme::ThemePreference;

use crate::command::{Command, HELP};
use crate::config::ReaderConfig;

/// Adapters the reader runs against.
pub struct Services {
    pub store: Arc<dyn PostStore>,
    pub content: Arc<dyn ContentGenerator>,
    pub images: Arc<dyn ImageGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub outputs: Arc<dyn AudioOutputFactory>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub probe: Box<dyn ColorSchemeProbe>,
}

pub struct Reader {
    feed: Feed,
    authoring: Authoring,
    speech: Arc<dyn SpeechSynthesizer>,
    outputs: Arc<dyn AudioOutputFactory>,
    playback: PlaybackConfig,
    session: Option<PlaybackSession>,
    carousel: Carousel,
    theme: ThemePreference,
    author: String,
}

fn summary_line(post: &Post) -> String {
    format!(
        "{:>9}  {}  ({}, {}, {})",
        post.id, post.title, post.author, post.date, post.read_time
    )
}

impl Reader {
    /// Load the theme and the first page.
    pub async fn start(services: Services, config: &ReaderConfig) -> anyhow::Result<Self> {
        let theme = ThemePreference::load(services.preferences, services.probe.as_ref()).await;
        let feed = Feed::new(services.store, config.feed.clone());
        feed.refresh().await?;
        let carousel = Carousel::new(feed.featured().await);

        Ok(Self {
            feed,
            authoring: Authoring::new(services.content, services.images),
            speech: services.speech,
            outputs: services.outputs,
            playback: config.playback.clone(),
            session: None,
            carousel,
            theme,
            author: config.author.clone(),
        })
    }

    /// Advance the carousel clock.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.carousel.tick(elapsed)
    }

    pub fn theme_name(&self) -> &'static str {
        self.theme.current().as_str()
    }

    /// Run one command. `None` means the reader should exit.
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<Option<String>> {
        let reply = match command {
            Command::Help => HELP.to_string(),
            Command::List => self.render_list().await,
            Command::More => {
                let outcome = self.feed.load_more().await?;
                self.describe_load(Some(outcome)).await
            }
            Command::Scroll => {
                let outcome = self.feed.on_sentinel_visibility(true).await?;
                self.feed.on_sentinel_visibility(false).await?;
                self.describe_load(outcome).await
            }
            Command::Search(query) => {
                self.feed.set_query(query).await;
                self.render_list().await
            }
            Command::Refresh => {
                self.end_session().await;
                self.feed.refresh().await?;
                self.carousel.set_slides(self.feed.featured().await);
                self.render_list().await
            }
            Command::Featured => self.render_slide().await,
            Command::Next => {
                self.carousel.next();
                self.render_slide().await
            }
            Command::Prev => {
                self.carousel.prev();
                self.render_slide().await
            }
            Command::Open(id) => self.open(&id).await,
            Command::Close => {
                self.end_session().await;
                self.feed.close_post().await;
                self.render_list().await
            }
            Command::Play => self.toggle_playback().await?,
            Command::Status => self.render_playback().await,
            Command::Delete(id) => self.delete(&id).await?,
            Command::New(form) => self.publish(form).await?,
            Command::Generate(title) => {
                let mut form = PostForm::titled(title);
                form.author = Some(self.author.clone());
                match self.authoring.auto_generate(&mut form).await {
                    Ok(()) => self.publish(form).await?,
                    Err(DomainError::Validation(msg)) => msg,
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Theme => {
                let theme = self.theme.toggle().await?;
                format!("Theme: {}", theme.as_str())
            }
            Command::Quit => {
                self.end_session().await;
                return Ok(None);
            }
        };
        Ok(Some(reply))
    }

    async fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }

    async fn render_list(&self) -> String {
        let mut out = String::new();
        let query = self.feed.query().await;
        if self.feed.shows_featured().await {
            if let Some(slide) = self.carousel.current() {
                let _ = writeln!(out, "Featured: {}", slide.title);
            }
        }
        for post in self.feed.visible_posts().await {
            let _ = writeln!(out, "{}", summary_line(&post));
        }
        let footer = match self.feed.status().await {
            FeedStatus::Loading => "Loading...".to_string(),
            FeedStatus::Empty => "No posts found.".to_string(),
            FeedStatus::Filtered => format!("Showing results for \"{query}\""),
            FeedStatus::HasMore => "-- scroll for more --".to_string(),
            FeedStatus::EndOfCollection => "You've reached the end of the list.".to_string(),
        };
        out.push_str(&footer);
        out
    }

    async fn describe_load(&self, outcome: Option<LoadOutcome>) -> String {
        let total = self.feed.posts().await.len();
        match outcome {
            Some(LoadOutcome::Loaded { added }) => format!("Loaded {added} more ({total} total)"),
            Some(LoadOutcome::Skipped(SkipReason::Exhausted)) => {
                "You've reached the end of the list.".to_string()
            }
            Some(LoadOutcome::Skipped(SkipReason::InFlight)) => "Already loading...".to_string(),
            Some(LoadOutcome::Skipped(SkipReason::InitialLoad)) => "Loading...".to_string(),
            Some(LoadOutcome::Discarded) => "Page dropped after refresh".to_string(),
            None => format!("Nothing to load ({total} posts)"),
        }
    }

    async fn render_slide(&self) -> String {
        if !self.feed.shows_featured().await {
            return "Featured posts are hidden while searching.".to_string();
        }
        match self.carousel.current() {
            Some(post) => format!(
                "[{}/{}] {}\n{}",
                self.carousel.index() + 1,
                self.carousel.len(),
                post.title,
                post.excerpt
            ),
            None => "No featured posts.".to_string(),
        }
    }

    async fn open(&mut self, id: &PostId) -> String {
        let Some(post) = self.feed.open(id).await else {
            return format!("No loaded post with id {id}");
        };
        self.end_session().await;
        self.session = Some(PlaybackSession::new(
            &post,
            self.speech.clone(),
            self.outputs.clone(),
            self.playback.clone(),
        ));

        let mut out = String::new();
        let _ = writeln!(out, "{}", post.title);
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            post.author,
            post.date,
            post.read_time,
            post.tags.join(", ")
        );
        for paragraph in post.paragraphs() {
            let _ = writeln!(out, "\n{paragraph}");
        }
        out.push_str("\n(play to listen, close to go back)");
        out
    }

    async fn toggle_playback(&self) -> anyhow::Result<String> {
        let Some(session) = &self.session else {
            return Ok("Open a post first.".to_string());
        };
        let reply = match session.toggle().await? {
            ToggleOutcome::Started => "Playing".to_string(),
            ToggleOutcome::Resumed { offset_secs } => format!("Resumed at {offset_secs:.1}s"),
            ToggleOutcome::Paused { offset_secs } => format!("Paused at {offset_secs:.1}s"),
            ToggleOutcome::Busy => "Generating audio...".to_string(),
            ToggleOutcome::Unavailable { notice } => notice.to_string(),
            ToggleOutcome::Closed => "Playback closed.".to_string(),
        };
        Ok(reply)
    }

    async fn render_playback(&self) -> String {
        let Some(session) = &self.session else {
            return "No post open.".to_string();
        };
        let snapshot = session.snapshot().await;
        let state = match snapshot.state {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Paused => "paused",
            PlaybackState::Playing => "playing",
        };
        match snapshot.duration_secs {
            Some(duration) => format!("{state} {:.1}s / {duration:.1}s", snapshot.position_secs),
            None => state.to_string(),
        }
    }

    async fn delete(&mut self, id: &PostId) -> anyhow::Result<String> {
        let was_open = self.feed.delete(id).await?;
        self.carousel.remove(id);
        if was_open {
            self.end_session().await;
        }
        Ok(format!("Deleted {id}"))
    }

    async fn publish(&mut self, form: PostForm) -> anyhow::Result<String> {
        match self.authoring.submit(&self.feed, &form).await {
            Ok(post) => Ok(format!("Published {}", summary_line(&post))),
            Err(DomainError::Validation(msg)) => Ok(msg),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pratik_infra::{
        FixedColorScheme, InMemoryPostStore, InMemoryPreferenceStore, NullAudioOutputFactory,
        OfflineGenerator,
    };

    use super::*;

    fn config() -> ReaderConfig {
        ReaderConfig {
            api_url: None,
            feed: Default::default(),
            playback: PlaybackConfig::default(),
            preferences_path: "unused.json".into(),
            seed_posts: 0,
            author: "Tester".to_string(),
        }
    }

    async fn reader(archive: usize, preferences: Arc<InMemoryPreferenceStore>) -> Reader {
        let generator = Arc::new(OfflineGenerator);
        let services = Services {
            store: Arc::new(InMemoryPostStore::seeded(archive)),
            content: generator.clone(),
            images: generator.clone(),
            speech: generator,
            outputs: Arc::new(NullAudioOutputFactory),
            preferences,
            probe: Box::new(FixedColorScheme(true)),
        };
        Reader::start(services, &config()).await.unwrap()
    }

    async fn run(reader: &mut Reader, line: &str) -> String {
        reader.execute(line.parse().unwrap()).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_scrolling_pages_through_the_feed() {
        let mut reader = reader(15, Arc::default()).await;
        assert!(run(&mut reader, "list").await.ends_with("-- scroll for more --"));

        assert_eq!(run(&mut reader, "scroll").await, "Loaded 9 more (18 total)");
        assert_eq!(run(&mut reader, "scroll").await, "Loaded 2 more (20 total)");
        assert_eq!(run(&mut reader, "scroll").await, "Nothing to load (20 posts)");
        assert!(
            run(&mut reader, "list")
                .await
                .ends_with("You've reached the end of the list.")
        );
    }

    #[tokio::test]
    async fn test_search_hides_featured_and_suspends_scrolling() {
        let mut reader = reader(15, Arc::default()).await;
        let listing = run(&mut reader, "search ai").await;

        assert!(listing.contains("The Future of AI in Web Development"));
        assert!(!listing.contains("Featured:"));
        assert!(listing.ends_with("Showing results for \"ai\""));
        assert_eq!(run(&mut reader, "scroll").await, "Nothing to load (9 posts)");
        assert_eq!(
            run(&mut reader, "featured").await,
            "Featured posts are hidden while searching."
        );
    }

    #[tokio::test]
    async fn test_open_play_and_delete() {
        let mut reader = reader(0, Arc::default()).await;

        assert_eq!(run(&mut reader, "play").await, "Open a post first.");
        let view = run(&mut reader, "open 2").await;
        assert!(view.starts_with("Mastering Tailwind CSS"));

        // The offline synthesizer never produces audio.
        assert_eq!(
            run(&mut reader, "play").await,
            "Sorry, audio generation is currently unavailable."
        );
        assert_eq!(run(&mut reader, "status").await, "idle");

        assert_eq!(run(&mut reader, "delete 2").await, "Deleted 2");
        assert_eq!(run(&mut reader, "status").await, "No post open.");
        assert!(!run(&mut reader, "list").await.contains("Mastering Tailwind CSS"));
    }

    #[tokio::test]
    async fn test_publishing_validates_the_form() {
        let mut reader = reader(0, Arc::default()).await;

        assert_eq!(
            run(&mut reader, "new Only a title").await,
            "missing required fields: author, content"
        );
        let published = run(&mut reader, "new Hello | Me | Body | news").await;
        assert!(published.starts_with("Published"));
        assert!(run(&mut reader, "list").await.contains("Hello  (Me,"));

        assert_eq!(run(&mut reader, "generate").await, "Please enter a title first!");
        assert!(run(&mut reader, "generate Rust").await.starts_with("Published"));
    }

    #[tokio::test]
    async fn test_theme_follows_system_then_persists() {
        let preferences = Arc::new(InMemoryPreferenceStore::new());
        let mut reader = reader(0, preferences.clone()).await;
        assert_eq!(reader.theme_name(), "dark");

        assert_eq!(run(&mut reader, "theme").await, "Theme: light");
        assert_eq!(preferences.get("theme").await.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_carousel_wraps_and_quit_exits() {
        let mut reader = reader(0, Arc::default()).await;
        assert!(run(&mut reader, "prev").await.starts_with("[5/5] Exploring the Cosmos"));
        assert!(run(&mut reader, "next").await.starts_with("[1/5]"));
        assert!(reader.tick(Duration::from_secs(5)));

        assert!(reader.execute(Command::Quit).await.unwrap().is_none());
    }
}
