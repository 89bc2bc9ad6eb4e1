//! Domain entities for the Visions domain
//!
//! Eras and their tech elements are static configuration. Session, gate and
//! result records are owned by the controller and handed out as snapshots.
//!
//! Download filenames are built from the era slug (`tech-review.png`), not the
//! display label, so they never contain spaces or parentheses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{SessionEvent, SessionPhase, SessionStateMachine, StateError};
use horizon_imagegen::QualityTier;

/// Message recorded when a failure carries no text of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "生成失败";

/// Campaign theme: the past decade or the coming frontier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    Review,
    Outlook,
}

impl Era {
    pub const ALL: [Era; 2] = [Era::Review, Era::Outlook];

    /// Identity used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Era::Review => "Review (The Past)",
            Era::Outlook => "Outlook (The Future)",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Era::Review => "review",
            Era::Outlook => "outlook",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Era::Review => "回顾：数字化沉淀",
            Era::Outlook => "展望：智能新纪元",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Era::Review => "The Era of Connectivity (2014-2024)",
            Era::Outlook => "The Frontier of Intelligence (2025+)",
        }
    }

    pub fn elements(&self) -> &'static [TechElement] {
        match self {
            Era::Review => REVIEW_ELEMENTS,
            Era::Outlook => OUTLOOK_ELEMENTS,
        }
    }

    /// Filename offered when downloading this era's image, keyed by slug
    pub fn download_filename(&self) -> String {
        format!("tech-{}.png", self.slug())
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled, iconified keyword woven into a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechElement {
    pub label: &'static str,
    pub icon: &'static str,
}

pub const REVIEW_ELEMENTS: &[TechElement] = &[
    TechElement { label: "小程序", icon: "📱" },
    TechElement { label: "App", icon: "📲" },
    TechElement { label: "智能建站", icon: "🌐" },
    TechElement { label: "SaaS 云", icon: "☁️" },
    TechElement { label: "私有云", icon: "🔒" },
    TechElement { label: "Docker", icon: "🐳" },
];

pub const OUTLOOK_ELEMENTS: &[TechElement] = &[
    TechElement { label: "AI 智能体", icon: "🤖" },
    TechElement { label: "具身机器人", icon: "🦾" },
    TechElement { label: "边缘计算", icon: "⚡" },
    TechElement { label: "智能硬件", icon: "🔌" },
];

/// Output of one successful generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    /// `data:image/png;base64,...`
    pub url: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(url: String, prompt: String) -> Self {
        Self {
            url,
            prompt,
            created_at: Utc::now(),
        }
    }
}

/// One era's session record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub result: Option<GenerationResult>,
}

impl SessionState {
    /// Apply an event, keeping `is_loading` in step with the phase
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, StateError> {
        let next = SessionStateMachine::transition(self.phase, event)?;
        self.phase = next;
        self.is_loading = next.is_loading();
        Ok(next)
    }
}

/// The two era sessions, each owned independently
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sessions {
    pub review: SessionState,
    pub outlook: SessionState,
}

impl Sessions {
    pub fn get(&self, era: Era) -> &SessionState {
        match era {
            Era::Review => &self.review,
            Era::Outlook => &self.outlook,
        }
    }

    pub fn get_mut(&mut self, era: Era) -> &mut SessionState {
        match era {
            Era::Review => &mut self.review,
            Era::Outlook => &mut self.outlook,
        }
    }
}

/// Credential-selection modal state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CredentialGateState {
    pub is_open: bool,
    pub pending_era: Option<Era>,
}

impl CredentialGateState {
    pub fn open(&mut self, era: Era) {
        self.is_open = true;
        self.pending_era = Some(era);
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.pending_era = None;
    }
}

/// Failure shown in the global banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraError {
    pub era: Era,
    pub message: String,
}

impl EraError {
    pub fn new(era: Era, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self { era, message }
    }
}

impl std::fmt::Display for EraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.era.label(), self.message)
    }
}

/// Point-in-time view of everything the display layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub quality: QualityTier,
    /// Banner text, `"<era label>: <message>"`
    pub error: Option<String>,
    pub gate: CredentialGateState,
    pub sessions: Sessions,
}
