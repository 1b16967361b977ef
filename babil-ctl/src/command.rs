use anyhow::{anyhow, bail};
use babil_client::{api::CommentId, SectionMsg};

pub const HELP: &str = "\
comment <text>       post a new comment
reply <id> <text>    reply to a comment
like <id>            like or unlike a comment
dislike <id>         dislike or undislike a comment
form <id>            open or close the reply form of a comment
expand <id>          show or hide the replies of a comment
show                 print the comments
dump                 print the comments as JSON
quit                 leave";

#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    Action(SectionMsg),
    Show,
    Dump,
    Help,
    Quit,
}

/// Parses one input line, `None` being a blank line
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let id = || -> anyhow::Result<CommentId> {
        match rest.split_whitespace().next() {
            Some(id) => Ok(CommentId::from(id)),
            None => Err(anyhow!("`{verb}` needs a comment id")),
        }
    };
    Ok(Some(match verb {
        "comment" => Command::Action(SectionMsg::Submit {
            text: String::from(rest),
            parent_id: None,
        }),
        "reply" => {
            let parent = id()?;
            let text = rest[parent.0.len()..].trim_start();
            Command::Action(SectionMsg::Submit {
                text: String::from(text),
                parent_id: Some(parent),
            })
        }
        "like" => Command::Action(SectionMsg::Like(id()?)),
        "dislike" => Command::Action(SectionMsg::Dislike(id()?)),
        "form" => Command::Action(SectionMsg::ToggleReplyForm(id()?)),
        "expand" => Command::Action(SectionMsg::ToggleReplies(id()?)),
        "show" => Command::Show,
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => bail!("unknown command `{verb}`, try `help`"),
    }))
}
