//! Mock dataset: five curated posts followed by generated archive volumes.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use pratik_core::domain::{DATE_FORMAT, Post, PostId};

const ARCHIVE_TITLES: &[&str] = &[
    "The Secrets of Javascript",
    "Understanding Cloud Computing",
    "Healthy Habits for Devs",
    "The Rise of Remote Work",
    "Machine Learning Basics",
    "Cybersecurity Trends",
    "Mobile App Design",
    "Digital Marketing 101",
    "Blockchain Explained",
    "UI/UX Best Practices",
    "The Power of Python",
    "Rust vs Go",
    "Sustainable Tech",
    "Smart Home Innovations",
    "VR and AR Futures",
];

const ARCHIVE_AUTHORS: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Robert Brown",
    "Lisa Wang",
    "David Wilson",
    "Emma Clark",
    "James Bond",
];

const ARCHIVE_TAGS: &[&str] = &[
    "Tech",
    "Life",
    "Coding",
    "Business",
    "Health",
    "Innovation",
    "Future",
    "Science",
];

const ONE_YEAR_MS: i64 = 31_536_000_000;

struct Curated {
    id: &'static str,
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    author: &'static str,
    date: &'static str,
    read_time: &'static str,
    tags: [&'static str; 3],
}

const CURATED: [Curated; 5] = [
    Curated {
        id: "1",
        title: "The Future of AI in Web Development",
        excerpt: "How generative AI is reshaping the way we build and deploy web applications.",
        content: "Artificial Intelligence is no longer just a buzzword. It is fundamentally changing how developers write code, test applications, and even design user interfaces. From automated testing to intelligent code completion, the landscape is shifting rapidly...",
        author: "Sarah Jenkins",
        date: "Oct 24, 2023",
        read_time: "5 min read",
        tags: ["AI", "Tech", "Future"],
    },
    Curated {
        id: "2",
        title: "Mastering Tailwind CSS",
        excerpt: "A deep dive into utility-first CSS and how to build responsive layouts faster.",
        content: "Tailwind CSS has revolutionized styling by providing a low-level utility belt. Instead of fighting with cascading overrides, developers can now compose designs directly in their markup. This guide explores advanced configuration...",
        author: "Mike Chen",
        date: "Oct 22, 2023",
        read_time: "8 min read",
        tags: ["CSS", "Design", "Frontend"],
    },
    Curated {
        id: "3",
        title: "The Zen of React Hooks",
        excerpt: "Understanding the mental model behind useEffect and useState.",
        content: "Hooks introduced a new way to share stateful logic between components. However, they also introduced new pitfalls like infinite loops in useEffect. Let us unravel the mysteries of dependency arrays...",
        author: "Emily Tao",
        date: "Oct 20, 2023",
        read_time: "6 min read",
        tags: ["React", "Code", "Tutorial"],
    },
    Curated {
        id: "4",
        title: "Minimalism in Digital Design",
        excerpt: "Why less is often more when it comes to user experience.",
        content: "Visual clutter kills conversion. In this post, we explore the principles of minimalism: whitespace, typography, and color theory. Learn how to guide the user eye without overwhelming them...",
        author: "Alex Rivera",
        date: "Oct 18, 2023",
        read_time: "4 min read",
        tags: ["UX", "Design", "Minimalism"],
    },
    Curated {
        id: "5",
        title: "Exploring the Cosmos",
        excerpt: "New discoveries from the James Webb Telescope.",
        content: "The universe is vast and full of mysteries. Recent images from the JWST have revealed galaxies formed shortly after the Big Bang, challenging our current models of cosmology...",
        author: "Dr. Alan Grant",
        date: "Oct 15, 2023",
        read_time: "10 min read",
        tags: ["Space", "Science", "Astronomy"],
    },
];

/// The five hand-written posts at the head of the mock collection.
pub fn curated_posts() -> Vec<Post> {
    CURATED
        .iter()
        .enumerate()
        .map(|(i, c)| Post {
            id: PostId::new(c.id),
            title: c.title.to_string(),
            excerpt: c.excerpt.to_string(),
            content: c.content.to_string(),
            author: c.author.to_string(),
            date: c.date.to_string(),
            image_url: format!("https://picsum.photos/800/600?random={}", i + 1),
            read_time: c.read_time.to_string(),
            tags: c.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// `count` generated archive posts with ids `gen-0`, `gen-1`, ...
pub fn archive_posts<R: Rng>(rng: &mut R, count: usize) -> Vec<Post> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let volume = i + 1;
            let title = ARCHIVE_TITLES.choose(rng).copied().unwrap_or("Untitled");
            let author = ARCHIVE_AUTHORS.choose(rng).copied().unwrap_or("Anonymous");
            let tag = ARCHIVE_TAGS.choose(rng).copied().unwrap_or("Tech");
            let date = now - Duration::milliseconds(rng.gen_range(0..ONE_YEAR_MS));

            Post {
                id: PostId::new(format!("gen-{i}")),
                title: format!("{title} - Vol. {volume}"),
                excerpt: format!(
                    "This is an automatically generated summary for post volume {volume}. It discusses key insights regarding {} and why it matters today.",
                    title.to_lowercase()
                ),
                content: format!(
                    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. \n\nDuis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.\n\nThis is placeholder content for article number {volume}."
                ),
                author: author.to_string(),
                date: date.format(DATE_FORMAT).to_string(),
                image_url: format!("https://picsum.photos/800/600?random={}", i + 20),
                read_time: format!("{} min read", rng.gen_range(3..13)),
                tags: vec![tag.to_string(), "Archive".to_string()],
            }
        })
        .collect()
}
