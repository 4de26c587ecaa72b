//! Line commands understood by the reader.

use pratik_core::authoring::PostForm;
use pratik_core::domain::PostId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    List,
    /// Fetch the next page explicitly.
    More,
    /// Scroll to the end of the list, exposing the sentinel.
    Scroll,
    Search(String),
    Refresh,
    Featured,
    Next,
    Prev,
    Open(PostId),
    Close,
    /// Play or pause speech for the open post.
    Play,
    Status,
    Delete(PostId),
    /// `new title | author | content | tags`
    New(PostForm),
    /// Draft a post from a title with the generators, then publish it.
    Generate(String),
    Theme,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn optional(part: Option<&str>) -> Option<String> {
    part.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_arg(arg: &str, usage: &str) -> Result<String, ParseError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(ParseError(format!("usage: {usage}")));
    }
    Ok(arg.to_string())
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "list" | "ls" => Command::List,
            "more" => Command::More,
            "scroll" => Command::Scroll,
            "search" | "/" => Command::Search(rest.trim().to_string()),
            "clear" => Command::Search(String::new()),
            "refresh" => Command::Refresh,
            "featured" => Command::Featured,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "open" => Command::Open(PostId::new(required_arg(rest, "open <id>")?)),
            "close" | "back" => Command::Close,
            "play" | "pause" => Command::Play,
            "status" => Command::Status,
            "delete" | "rm" => Command::Delete(PostId::new(required_arg(rest, "delete <id>")?)),
            "new" => {
                let mut parts = rest.splitn(4, '|');
                Command::New(PostForm {
                    title: optional(parts.next()),
                    author: optional(parts.next()),
                    content: optional(parts.next()),
                    tags: optional(parts.next()),
                    ..Default::default()
                })
            }
            "generate" | "gen" => Command::Generate(rest.trim().to_string()),
            "theme" => Command::Theme,
            "quit" | "exit" | "q" => Command::Quit,
            "" => return Err(ParseError("empty command".to_string())),
            other => return Err(ParseError(format!("unknown command `{other}`, try `help`"))),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
list                          show the loaded posts
more | scroll                 load the next page / scroll to the end of the list
search <text> | clear         filter by title or tag
refresh                       reload from the first page
featured | next | prev        featured carousel
open <id> | close             open or close a post
play | status                 toggle speech for the open post / show playback state
new title | author | content | tags
generate <title>              draft with AI and publish
delete <id>                   delete a post
theme                         toggle light/dark
quit";
