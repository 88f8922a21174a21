#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use storechat_core::{
    ApiError, ChatApi, ChatResponse, ScheduledTask, Scheduler, Surface, UndoToken, ViewOp,
    ViewState,
};

pub const KEY: &str = "techstore_history_v1";

/// Scheduler whose countdowns only fire when a test says so
#[derive(Clone, Default)]
pub struct ManualScheduler {
    log: Rc<RefCell<ScheduleLog>>,
}

#[derive(Default)]
pub struct ScheduleLog {
    pub scheduled: Vec<(UndoToken, Duration)>,
    pub cancelled: Vec<UndoToken>,
}

impl ManualScheduler {
    pub fn latest(&self) -> Option<UndoToken> {
        self.log.borrow().scheduled.last().map(|(token, _)| *token)
    }

    pub fn scheduled(&self) -> Vec<(UndoToken, Duration)> {
        self.log.borrow().scheduled.clone()
    }

    pub fn cancelled(&self) -> Vec<UndoToken> {
        self.log.borrow().cancelled.clone()
    }
}

pub struct ManualTask {
    token: UndoToken,
    cancelled: bool,
    log: Rc<RefCell<ScheduleLog>>,
}

impl ScheduledTask for ManualTask {
    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.log.borrow_mut().cancelled.push(self.token);
        }
    }
}

impl Scheduler for ManualScheduler {
    type Task = ManualTask;

    fn schedule(&self, token: UndoToken, delay: Duration) -> ManualTask {
        self.log.borrow_mut().scheduled.push((token, delay));
        ManualTask {
            token,
            cancelled: false,
            log: self.log.clone(),
        }
    }
}

/// Endpoint answering from a queue of canned results
#[derive(Default)]
pub struct ScriptedApi {
    responses: RefCell<VecDeque<Result<ChatResponse, ApiError>>>,
    pub received: RefCell<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(ChatResponse::reply(text)));
        self
    }

    pub fn error(self, text: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(ChatResponse::error(text)));
        self
    }

    pub fn unreachable(self) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(ApiError::Transport("connection refused".to_string())));
        self
    }
}

#[async_trait(?Send)]
impl ChatApi for ScriptedApi {
    async fn send_chat_message(&self, message: &str) -> Result<ChatResponse, ApiError> {
        self.received.borrow_mut().push(message.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }
}

/// Endpoint that holds each request until the test releases it
#[derive(Default)]
pub struct GatedApi {
    gates: RefCell<VecDeque<oneshot::Receiver<ChatResponse>>>,
}

impl GatedApi {
    pub fn gate(&self) -> oneshot::Sender<ChatResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }
}

#[async_trait(?Send)]
impl ChatApi for GatedApi {
    async fn send_chat_message(&self, _message: &str) -> Result<ChatResponse, ApiError> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx.await.map_err(|_| ApiError::Transport("gate dropped".to_string())),
            None => Err(ApiError::Transport("no gate".to_string())),
        }
    }
}

/// Surface folding every op into a [`ViewState`]
#[derive(Default)]
pub struct RecordingSurface {
    pub view: RefCell<ViewState>,
    pub ops: RefCell<Vec<ViewOp>>,
    pub max_typing: Cell<usize>,
}

impl RecordingSurface {
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }
}

impl Surface for RecordingSurface {
    fn apply(&self, op: &ViewOp) {
        let mut view = self.view.borrow_mut();
        view.apply(op);
        self.max_typing.set(self.max_typing.get().max(view.typing_indicators));
        self.ops.borrow_mut().push(op.clone());
    }
}
