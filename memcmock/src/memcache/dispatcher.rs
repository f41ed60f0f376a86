//! Deferred result delivery.
//!
//! Commands mutate the store immediately but never call back from within
//! the calling frame. Each result is queued together with an
//! [`InvocationContext`] and delivered on a later turn of the queue, in
//! the order the commands were issued.

use crate::cache::cache::{CasToken, Value};
use crate::cache::error::CacheError;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Notify;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Touch,
    Get,
    Set,
    Gets,
    GetMulti,
    Replace,
    Add,
    Cas,
    Append,
    Prepend,
    Incr,
    Decr,
    Delete,
    Version,
    Flush,
    Stats,
    Settings,
    Slabs,
    Items,
    Cachedump,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Touch => "touch",
            Command::Get => "get",
            Command::Set => "set",
            Command::Gets => "gets",
            Command::GetMulti => "getMulti",
            Command::Replace => "replace",
            Command::Add => "add",
            Command::Cas => "cas",
            Command::Append => "append",
            Command::Prepend => "prepend",
            Command::Incr => "incr",
            Command::Decr => "decr",
            Command::Delete => "delete",
            Command::Version => "version",
            Command::Flush => "flush",
            Command::Stats => "stats",
            Command::Settings => "settings",
            Command::Slabs => "slabs",
            Command::Items => "items",
            Command::Cachedump => "cachedump",
        }
    }

    /// Names the positional arguments of the command are bound to
    pub fn argument_names(&self) -> &'static [&'static str] {
        match self {
            Command::Get | Command::Gets | Command::Delete => &["key"],
            Command::GetMulti => &["keys"],
            Command::Set | Command::Add | Command::Replace => &["key", "value", "lifetime"],
            Command::Cas => &["key", "value", "cas", "lifetime"],
            Command::Append | Command::Prepend | Command::Incr | Command::Decr => {
                &["key", "value"]
            }
            Command::Touch => &["key", "lifetime"],
            Command::Cachedump => &["server", "slabid", "number"],
            Command::Version
            | Command::Flush
            | Command::Stats
            | Command::Settings
            | Command::Slabs
            | Command::Items => &[],
        }
    }
}

/// Argument as it reached a command
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    Text(String),
    List(Vec<String>),
    Value(Value),
    Integer(i64),
    Float(f64),
    Token(CasToken),
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Text(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Text(value.to_owned())
    }
}

impl From<Vec<String>> for Argument {
    fn from(value: Vec<String>) -> Self {
        Argument::List(value)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Integer(value)
    }
}

impl From<u32> for Argument {
    fn from(value: u32) -> Self {
        Argument::Integer(value as i64)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Float(value)
    }
}

impl From<CasToken> for Argument {
    fn from(value: CasToken) -> Self {
        Argument::Token(value)
    }
}

/// Per call record handed to the callback
#[derive(Clone, Debug)]
pub struct InvocationContext {
    start: SystemTime,
    started: Instant,
    command: Command,
    arguments: Vec<(&'static str, Argument)>,
    execution: Option<Duration>,
}

impl InvocationContext {
    /// Binds `arguments` positionally to the command's argument names
    pub fn new(command: Command, arguments: Vec<Argument>) -> InvocationContext {
        let names = command.argument_names();
        debug_assert_eq!(names.len(), arguments.len());
        InvocationContext {
            start: SystemTime::now(),
            started: Instant::now(),
            command,
            arguments: names.iter().copied().zip(arguments).collect(),
            execution: None,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Wall clock time the command was issued at
    pub fn start(&self) -> SystemTime {
        self.start
    }

    /// Time between issuing the command and delivering its result,
    /// set once the callback fires
    pub fn execution(&self) -> Option<Duration> {
        self.execution
    }

    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|(arg_name, _)| *arg_name == name)
            .map(|(_, argument)| argument)
    }

    pub fn arguments(&self) -> &[(&'static str, Argument)] {
        &self.arguments
    }

    /// Names of the bound arguments, in call order
    pub fn validate(&self) -> Vec<&'static str> {
        self.arguments.iter().map(|(name, _)| *name).collect()
    }

    fn stamp(&mut self) {
        self.execution = Some(self.started.elapsed());
    }
}

/// Callback receiving `(context, error, result)` of a command, boxed
pub type BoxedCallback<T> = Box<dyn FnOnce(&InvocationContext, Option<CacheError>, T) + Send>;

type Task = Box<dyn FnOnce() + Send>;

/// Callbacks taken by a running turn, requeued on drop if not delivered
struct Turn<'a> {
    dispatcher: &'a CallbackDispatcher,
    remaining: VecDeque<Task>,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        if self.remaining.is_empty() {
            return;
        }
        warn!(
            "Turn interrupted, requeueing {} callbacks",
            self.remaining.len()
        );
        let mut queue = self.dispatcher.lock();
        while let Some(task) = self.remaining.pop_back() {
            queue.push_front(task);
        }
        drop(queue);
        self.dispatcher.notify.notify_one();
    }
}

/// FIFO queue of pending callbacks
#[derive(Default)]
pub struct CallbackDispatcher {
    queue: Mutex<VecDeque<Task>>,
    notify: Notify,
}

impl CallbackDispatcher {
    pub fn new() -> CallbackDispatcher {
        CallbackDispatcher::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues delivery of `(error, result)` for a later turn
    pub fn schedule<T, F>(
        &self,
        mut context: InvocationContext,
        error: Option<CacheError>,
        result: T,
        callback: F,
    ) where
        T: Send + 'static,
        F: FnOnce(&InvocationContext, Option<CacheError>, T) + Send + 'static,
    {
        trace!("Scheduling callback for: {}", context.command().as_str());
        let task: Task = Box::new(move || {
            context.stamp();
            callback(&context, error, result);
        });
        self.lock().push_back(task);
        self.notify.notify_one();
    }

    /// Runs one turn: delivers the callbacks queued before it started.
    /// Callbacks scheduled while the turn runs wait for the next one.
    ///
    /// If a callback panics the panic propagates, and the callbacks of the
    /// turn that did not run yet go back to the front of the queue.
    pub fn run_pending_tasks(&self) -> usize {
        let mut turn = Turn {
            dispatcher: self,
            remaining: std::mem::take(&mut *self.lock()),
        };
        let mut delivered = 0;
        while let Some(task) = turn.remaining.pop_front() {
            task();
            delivered += 1;
        }
        if delivered > 0 {
            trace!("Delivered {} callbacks", delivered);
        }
        delivered
    }

    /// Runs turns until nothing is left to deliver
    pub fn run_until_idle(&self) -> usize {
        let mut delivered = 0;
        loop {
            let turn = self.run_pending_tasks();
            if turn == 0 {
                return delivered;
            }
            delivered += turn;
        }
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Resolves once something was scheduled since the last wake up
    pub async fn notified(&self) {
        self.notify.notified().await
    }
}
