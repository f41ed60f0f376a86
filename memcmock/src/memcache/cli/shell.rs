//! Line oriented command shell on top of [`Memcached`].
//!
//! One command per line, words separated by whitespace, for example
//! `set foo bar 10` or `get foo baz`. Every command replies with exactly
//! one line rendered from its callback's `(error, result)`.

use crate::cache::cache::{CasToken, CasValue, Value};
use crate::cache::error::CacheError;
use crate::memcache::client::Memcached;
use crate::memcache::dispatcher::InvocationContext;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::str::{FromStr, SplitWhitespace};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone, Debug, PartialEq)]
pub enum ShellCommand {
    Get { key: String },
    GetMulti { keys: Vec<String> },
    Gets { key: String },
    Set { key: String, value: Value, ttl: i64 },
    Add { key: String, value: Value, ttl: i64 },
    Replace { key: String, value: Value, ttl: i64 },
    Cas { key: String, value: Value, cas: CasToken, ttl: i64 },
    Append { key: String, value: Value },
    Prepend { key: String, value: Value },
    Incr { key: String, amount: f64 },
    Decr { key: String, amount: f64 },
    Touch { key: String, ttl: i64 },
    Delete { key: String },
    Flush,
    Version,
    Stats,
    Settings,
    Slabs,
    Items,
    Cachedump { server: String, slab_id: u32, limit: u32 },
    End,
}

impl ShellCommand {
    /// Whether the command produces a reply line
    pub fn replies(&self) -> bool {
        !matches!(self, ShellCommand::End)
    }
}

struct Words<'a> {
    command: &'a str,
    words: SplitWhitespace<'a>,
}

impl<'a> Words<'a> {
    fn next(&mut self, name: &str) -> Result<&'a str, String> {
        self.words
            .next()
            .ok_or_else(|| format!("{}: missing <{}>", self.command, name))
    }

    fn key(&mut self) -> Result<String, String> {
        self.next("key").map(String::from)
    }

    fn value(&mut self) -> Result<Value, String> {
        self.next("value").map(parse_value)
    }

    fn number<T: FromStr>(&mut self, name: &str) -> Result<T, String> {
        let word = self.next(name)?;
        word.parse::<T>()
            .map_err(|_| format!("{}: invalid <{}> `{}`", self.command, name, word))
    }

    fn optional_ttl(&mut self) -> Result<i64, String> {
        match self.words.next() {
            Some(word) => word
                .parse()
                .map_err(|_| format!("{}: invalid <ttl> `{}`", self.command, word)),
            None => Ok(0),
        }
    }

    fn finish(mut self, command: ShellCommand) -> Result<ShellCommand, String> {
        match self.words.next() {
            Some(extra) => Err(format!("{}: unexpected argument `{}`", self.command, extra)),
            None => Ok(command),
        }
    }
}

/// Words that read as a finite number are stored as numbers, anything
/// else as text.
fn parse_value(word: &str) -> Value {
    match word.parse::<f64>() {
        Ok(number) if number.is_finite() => Value::Number(number),
        _ => Value::from(word),
    }
}

pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let mut split = line.split_whitespace();
    let command = split.next().ok_or_else(|| String::from("empty command"))?;
    let mut words = Words {
        command,
        words: split,
    };
    let parsed = match command.to_ascii_lowercase().as_str() {
        "get" => {
            let mut keys = vec![words.key()?];
            keys.extend(words.words.by_ref().map(String::from));
            if keys.len() == 1 {
                ShellCommand::Get {
                    key: keys.remove(0),
                }
            } else {
                ShellCommand::GetMulti { keys }
            }
        }
        "gets" => ShellCommand::Gets { key: words.key()? },
        "set" => ShellCommand::Set {
            key: words.key()?,
            value: words.value()?,
            ttl: words.optional_ttl()?,
        },
        "add" => ShellCommand::Add {
            key: words.key()?,
            value: words.value()?,
            ttl: words.optional_ttl()?,
        },
        "replace" => ShellCommand::Replace {
            key: words.key()?,
            value: words.value()?,
            ttl: words.optional_ttl()?,
        },
        "cas" => ShellCommand::Cas {
            key: words.key()?,
            value: words.value()?,
            cas: words.number("cas")?,
            ttl: words.optional_ttl()?,
        },
        "append" => ShellCommand::Append {
            key: words.key()?,
            value: words.value()?,
        },
        "prepend" => ShellCommand::Prepend {
            key: words.key()?,
            value: words.value()?,
        },
        "incr" => ShellCommand::Incr {
            key: words.key()?,
            amount: words.number("amount")?,
        },
        "decr" => ShellCommand::Decr {
            key: words.key()?,
            amount: words.number("amount")?,
        },
        "touch" => ShellCommand::Touch {
            key: words.key()?,
            ttl: words.number("ttl")?,
        },
        "delete" => ShellCommand::Delete { key: words.key()? },
        "flush" => ShellCommand::Flush,
        "version" => ShellCommand::Version,
        "stats" => ShellCommand::Stats,
        "settings" => ShellCommand::Settings,
        "slabs" => ShellCommand::Slabs,
        "items" => ShellCommand::Items,
        "cachedump" => ShellCommand::Cachedump {
            server: words.next("server")?.to_owned(),
            slab_id: words.number("slabid")?,
            limit: words.number("number")?,
        },
        "end" | "quit" => ShellCommand::End,
        _ => return Err(format!("unknown command `{}`", command)),
    };
    words.finish(parsed)
}

fn render_error(error: Option<CacheError>) -> String {
    match error {
        Some(err) => format!("Some({})", err),
        None => String::from("None"),
    }
}

fn reply<T, R>(
    output: UnboundedSender<String>,
    render: R,
) -> impl FnOnce(&InvocationContext, Option<CacheError>, T) + Send + 'static
where
    T: Send + 'static,
    R: FnOnce(T) -> String + Send + 'static,
{
    move |ctx: &InvocationContext, error: Option<CacheError>, result: T| {
        debug!(
            "{} delivered after {:?}",
            ctx.command().as_str(),
            ctx.execution()
        );
        let line = format!("({}, {})", render_error(error), render(result));
        if output.send(line).is_err() {
            warn!("Shell output closed, dropping reply");
        }
    }
}

fn debug_reply<T>(
    output: UnboundedSender<String>,
) -> impl FnOnce(&InvocationContext, Option<CacheError>, T) + Send + 'static
where
    T: Debug + Send + 'static,
{
    reply(output, |result: T| format!("{:?}", result))
}

fn render_value(value: Option<Value>) -> String {
    match value {
        Some(value) => format!("Some({:?})", value.to_string()),
        None => String::from("None"),
    }
}

/// Runs `command` against `client`, the reply is sent to `output` once the
/// client's dispatcher delivers the callback.
pub fn execute(client: &Memcached, command: ShellCommand, output: UnboundedSender<String>) {
    match command {
        ShellCommand::Get { key } => client.get(key, reply(output, render_value)),
        ShellCommand::GetMulti { keys } => client.get_multi(
            keys,
            reply(output, |values: HashMap<String, Value>| {
                let sorted: BTreeMap<String, String> = values
                    .into_iter()
                    .map(|(key, value)| (key, value.to_string()))
                    .collect();
                format!("{:?}", sorted)
            }),
        ),
        ShellCommand::Gets { key } => client.gets(
            key,
            reply(output, |value: Option<CasValue>| {
                match value {
                    Some(value) => format!("Some({:?}, cas {})", value.value.to_string(), value.cas),
                    None => String::from("None"),
                }
            }),
        ),
        ShellCommand::Set { key, value, ttl } => client.set(key, value, ttl, debug_reply(output)),
        ShellCommand::Add { key, value, ttl } => client.add(key, value, ttl, debug_reply(output)),
        ShellCommand::Replace { key, value, ttl } => {
            client.replace(key, value, ttl, debug_reply(output))
        }
        ShellCommand::Cas {
            key,
            value,
            cas,
            ttl,
        } => client.cas(key, value, cas, ttl, debug_reply(output)),
        ShellCommand::Append { key, value } => client.append(key, value, debug_reply(output)),
        ShellCommand::Prepend { key, value } => client.prepend(key, value, debug_reply(output)),
        ShellCommand::Incr { key, amount } => client.incr(key, amount, debug_reply(output)),
        ShellCommand::Decr { key, amount } => client.decr(key, amount, debug_reply(output)),
        ShellCommand::Touch { key, ttl } => client.touch(key, ttl, debug_reply(output)),
        ShellCommand::Delete { key } => client.delete(key, debug_reply(output)),
        ShellCommand::Flush => client.flush(debug_reply(output)),
        ShellCommand::Version => client.version(debug_reply(output)),
        ShellCommand::Stats => client.stats(debug_reply(output)),
        ShellCommand::Settings => client.settings(debug_reply(output)),
        ShellCommand::Slabs => client.slabs(debug_reply(output)),
        ShellCommand::Items => client.items(debug_reply(output)),
        ShellCommand::Cachedump {
            server,
            slab_id,
            limit,
        } => client.cachedump(server, slab_id, limit, debug_reply(output)),
        ShellCommand::End => client.end(),
    }
}
