use crate::errors::AppError;
use crate::models::User;
use crate::store::{find_by_phone, UserRepository};

/// Sent to numbers we don't know and when a reply couldn't be recorded.
/// It reads the same either way so it reveals nothing about registration.
pub const NEUTRAL_ACK: &str = "收到，谢谢！(Message received, thank you.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Ok,
    No,
    Start,
}

impl Keyword {
    /// Case- and whitespace-insensitive match against the reply vocabulary.
    pub fn parse(body: &str) -> Option<Self> {
        match body.trim().to_uppercase().as_str() {
            "OK" | "DONE" | "完成" | "做了" | "好" => Some(Keyword::Ok),
            "NO" | "STOP" | "UNSUBSCRIBE" | "QUIT" | "CANCEL" => Some(Keyword::No),
            "START" | "RESUME" | "SUBSCRIBE" => Some(Keyword::Start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    Confirmed,
    OptedOut,
    Resubscribed,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub action: ReplyAction,
    /// The sender's `active` flag after the reply was applied.
    pub active: bool,
    pub text: String,
}

pub fn ok_ack(name: &str) -> String {
    format!("👏 太棒了 {name}！今天的锻炼完成了，继续保持！(Great job, keep it up!)")
}

pub fn opt_out_confirmation(name: &str) -> String {
    format!(
        "{name}，已收到您的请求。提醒已暂停。\n\n\
         如果以后想重新开始，随时回复 START 即可。(Reminders paused. Reply START to resume.)\n\
         祝您健康快乐！❤️"
    )
}

pub fn opt_in_confirmation(name: &str) -> String {
    format!(
        "太好了 {name}！欢迎回来！\n\n\
         提醒已重新开启。(Reminders are back on.)\n\
         一起加油！💪"
    )
}

pub fn help_message(name: &str) -> String {
    format!(
        "{name}，收到您的消息。\n\
         回复 OK 确认完成锻炼，回复 NO 暂停提醒，回复 START 重新开始。\n\
         (Reply OK when done, NO to pause reminders, START to resume.)"
    )
}

/// Applies a reply to a single user. Returns the reply and whether the record changed.
pub fn interpret(user: &mut User, body: &str) -> (Reply, bool) {
    let before = user.active;
    let (action, text) = match Keyword::parse(body) {
        Some(Keyword::Ok) => (ReplyAction::Confirmed, ok_ack(&user.name)),
        Some(Keyword::No) => {
            user.active = false;
            (ReplyAction::OptedOut, opt_out_confirmation(&user.name))
        }
        Some(Keyword::Start) => {
            user.active = true;
            (ReplyAction::Resubscribed, opt_in_confirmation(&user.name))
        }
        None => (ReplyAction::Help, help_message(&user.name)),
    };

    let reply = Reply {
        action,
        active: user.active,
        text,
    };
    (reply, user.active != before)
}

/// Handles an inbound SMS. The caller must hold the repository lock.
pub fn handle_reply(repo: &dyn UserRepository, phone: &str, body: &str) -> Result<Reply, AppError> {
    let mut users = repo.load_all()?;
    let Some(user) = find_by_phone(&mut users, phone) else {
        tracing::warn!(from = %phone, "reply from unknown number");
        return Err(AppError::UnknownSender);
    };

    let (reply, changed) = interpret(user, body);
    tracing::info!(
        phone = %phone,
        name = %user.name,
        action = ?reply.action,
        active = reply.active,
        "processed reply"
    );

    if changed {
        repo.save_all(&users)?;
    }

    Ok(reply)
}
