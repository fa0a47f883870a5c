//! Verification session management.
//!
//! Exactly one challenge lives in each session, exclusively owned by it.
//! The only scheduled work is the oracle's delayed reply to a board move:
//! a single cancellable task per session, guarded by a generation counter
//! so a callback that loses a race with `reset` or teardown never touches
//! the refreshed state. The session lock is never held across an await.

use crate::config::ServerConfig;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use humancheck_games::challenges::{
    Captcha, ChallengeKind, ClickOutcome, Quiz, QuizOutcome, QuizStatus, ReflexGame, reflex,
};
use humancheck_games::{Judge, Phase, Player, Square, Verdict};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a verification session.
pub type SessionId = String;

const SESSION_ID_LEN: usize = 8;

/// The challenge a session owns.
#[derive(Debug)]
enum ChallengeState {
    /// Oracle-judged board game.
    Board(Judge),
    /// Staged quiz racing a deadline.
    Quiz {
        quiz: Quiz,
        deadline: DateTime<Utc>,
    },
    /// Captcha string round.
    Captcha(Captcha),
    /// Reflex pattern game against the server clock.
    Reflex {
        game: ReflexGame,
        started: DateTime<Utc>,
    },
}

impl ChallengeState {
    fn kind(&self) -> ChallengeKind {
        match self {
            ChallengeState::Board(_) => ChallengeKind::Board,
            ChallengeState::Quiz { .. } => ChallengeKind::Quiz,
            ChallengeState::Captcha(_) => ChallengeKind::Captcha,
            ChallengeState::Reflex { .. } => ChallengeKind::Reflex,
        }
    }
}

/// One verification attempt and its challenge state.
#[derive(Debug)]
struct VerifySession {
    id: SessionId,
    challenge: ChallengeState,
    created_at: DateTime<Utc>,
    /// Bumped on reset and teardown; stale oracle callbacks compare
    /// against it before mutating anything.
    generation: u64,
    /// Pending oracle reply, if one is scheduled.
    oracle_task: Option<AbortHandle>,
}

impl VerifySession {
    fn cancel_oracle_task(&mut self) {
        if let Some(task) = self.oracle_task.take() {
            debug!(session_id = %self.id, "cancelling pending oracle reply");
            task.abort();
        }
    }
}

/// Read-only session snapshot, safe to hand to rendering callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Challenge-specific state.
    #[serde(flatten)]
    pub challenge: ChallengeView,
}

/// Challenge-specific slice of a session snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeView {
    /// Board game snapshot.
    Board {
        /// Side length.
        size: usize,
        /// Squares in row-major order.
        squares: Vec<Square>,
        /// Current phase.
        phase: Phase,
        /// Verification outcome, once terminal.
        verified: Option<bool>,
        /// True while the oracle's reply is pending.
        oracle_pending: bool,
    },
    /// Quiz snapshot.
    Quiz {
        /// Zero-based active stage.
        stage: usize,
        /// Prompt of the active stage.
        prompt: &'static str,
        /// Attempt status.
        status: QuizStatus,
        /// Feedback line for a settled attempt.
        feedback: Option<&'static str>,
        /// Whole seconds until the deadline, clamped at zero.
        seconds_left: i64,
    },
    /// Captcha snapshot.
    Captcha {
        /// The string to reproduce.
        text: String,
    },
    /// Reflex game snapshot.
    Reflex {
        /// Arena radius.
        radius: f64,
        /// Scaled milliseconds each pattern stays active.
        pattern_duration_ms: u64,
        /// Wall-clock scaling the server applies to click times.
        speed_multiplier: u64,
        /// Decided outcome, once clicked.
        outcome: Option<ClickOutcome>,
    },
}

/// Outcome of a board move, paired with the refreshed snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    /// Verdict for this move.
    pub verdict: Verdict,
    /// True when the oracle's reply has been scheduled.
    pub oracle_pending: bool,
    /// Session snapshot after the move was recorded.
    pub session: SessionView,
}

/// Manages all verification sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: Arc<ServerConfig>,
    sessions: Arc<Mutex<HashMap<SessionId, VerifySession>>>,
}

impl SessionManager {
    /// Creates a session manager backed by `config`.
    #[instrument(skip(config))]
    pub fn new(config: Arc<ServerConfig>) -> Self {
        info!("creating session manager");
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The configuration sessions are created from.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Creates a session holding a fresh challenge of `kind`.
    #[instrument(skip(self))]
    pub fn create(&self, kind: ChallengeKind, board_size: Option<usize>) -> SessionView {
        let mut rng = rand::rng();
        let now = Utc::now();
        let challenge = match kind {
            ChallengeKind::Board => {
                let size = board_size.unwrap_or(*self.config.board_size());
                ChallengeState::Board(Judge::new(size, Player::X))
            }
            ChallengeKind::Quiz => ChallengeState::Quiz {
                quiz: Quiz::new(),
                deadline: self.quiz_deadline(now),
            },
            ChallengeKind::Captcha => {
                ChallengeState::Captcha(Captcha::generate(&mut rng, *self.config.captcha_len()))
            }
            ChallengeKind::Reflex => ChallengeState::Reflex {
                game: ReflexGame::new(),
                started: now,
            },
        };

        let mut sessions = self.sessions.lock().unwrap();
        let mut id = random_id(&mut rng);
        while sessions.contains_key(&id) {
            id = random_id(&mut rng);
        }
        let session = VerifySession {
            id: id.clone(),
            challenge,
            created_at: now,
            generation: 0,
            oracle_task: None,
        };
        let view = view_of(&session);
        sessions.insert(id.clone(), session);
        info!(session_id = %id, %kind, "session created");
        view
    }

    /// Read-only snapshot of a session.
    #[instrument(skip(self))]
    pub fn view(&self, id: &str) -> Result<SessionView, ApiError> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(id).ok_or_else(|| not_found(id))?;
        Ok(view_of(session))
    }

    /// Submits a human board move and, when a reply is due, schedules the
    /// oracle's answer after the configured delay.
    #[instrument(skip(self))]
    pub fn submit_move(&self, id: &str, index: usize) -> Result<MoveOutcome, ApiError> {
        let (outcome, generation) = {
            let mut sessions = self.sessions.lock().unwrap();
            let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
            let actual = session.challenge.kind();
            let (verdict, oracle_pending) = match &mut session.challenge {
                ChallengeState::Board(judge) => {
                    let verdict = judge.submit_human_move(index)?;
                    (verdict, judge.phase() == Phase::AwaitingOracle)
                }
                _ => return Err(wrong_challenge(ChallengeKind::Board, id, actual)),
            };
            info!(session_id = %id, index, ?verdict, oracle_pending, "human move recorded");
            (
                MoveOutcome {
                    verdict,
                    oracle_pending,
                    session: view_of(session),
                },
                session.generation,
            )
        };
        if outcome.oracle_pending {
            let delay = Duration::from_millis(*self.config.oracle_delay_ms());
            self.schedule_oracle_reply(id.to_string(), generation, delay);
        }
        Ok(outcome)
    }

    /// Grades a quiz answer, or a skip, against the active stage.
    ///
    /// A submission past the deadline expires the quiz instead of grading
    /// the answer.
    #[instrument(skip(self, answer))]
    pub fn submit_answer(
        &self,
        id: &str,
        answer: &str,
        skip: bool,
    ) -> Result<(QuizOutcome, SessionView), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        let actual = session.challenge.kind();
        let outcome = match &mut session.challenge {
            ChallengeState::Quiz { quiz, deadline } => {
                if quiz.status() == QuizStatus::Pending && Utc::now() >= *deadline {
                    quiz.expire()
                } else if skip {
                    quiz.skip()
                } else {
                    quiz.submit(answer)
                }
            }
            _ => return Err(wrong_challenge(ChallengeKind::Quiz, id, actual)),
        };
        info!(session_id = %id, ?outcome, "quiz submission graded");
        Ok((outcome, view_of(session)))
    }

    /// Checks a captcha attempt, or redraws the string when `refresh` is
    /// set. Returns `None` as the verdict on refresh.
    #[instrument(skip(self, input))]
    pub fn submit_captcha(
        &self,
        id: &str,
        input: &str,
        refresh: bool,
    ) -> Result<(Option<bool>, SessionView), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        let actual = session.challenge.kind();
        let verdict = match &mut session.challenge {
            ChallengeState::Captcha(captcha) => {
                if refresh {
                    captcha.refresh(&mut rand::rng(), *self.config.captcha_len());
                    None
                } else {
                    Some(captcha.verify(input))
                }
            }
            _ => return Err(wrong_challenge(ChallengeKind::Captcha, id, actual)),
        };
        info!(session_id = %id, ?verdict, "captcha attempt handled");
        Ok((verdict, view_of(session)))
    }

    /// Judges a reflex click at the server-side elapsed time.
    #[instrument(skip(self))]
    pub fn submit_click(&self, id: &str) -> Result<(ClickOutcome, SessionView), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        let actual = session.challenge.kind();
        let (outcome, elapsed) = match &mut session.challenge {
            ChallengeState::Reflex { game, started } => {
                let elapsed = scaled_elapsed_ms(*started, Utc::now());
                (game.click(elapsed), elapsed)
            }
            _ => return Err(wrong_challenge(ChallengeKind::Reflex, id, actual)),
        };
        info!(session_id = %id, elapsed, ?outcome, "reflex click judged");
        Ok((outcome, view_of(session)))
    }

    /// Resets a session's challenge and cancels any pending oracle reply.
    #[instrument(skip(self))]
    pub fn reset(&self, id: &str) -> Result<SessionView, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        session.generation += 1;
        session.cancel_oracle_task();
        let now = Utc::now();
        match &mut session.challenge {
            ChallengeState::Board(judge) => judge.reset(),
            ChallengeState::Quiz { quiz, deadline } => {
                quiz.reset();
                *deadline = self.quiz_deadline(now);
            }
            ChallengeState::Captcha(captcha) => {
                captcha.refresh(&mut rand::rng(), *self.config.captcha_len());
            }
            ChallengeState::Reflex { game, started } => {
                game.reset();
                *started = now;
            }
        }
        info!(session_id = %id, "session reset");
        Ok(view_of(session))
    }

    /// Tears a session down, cancelling any pending oracle reply.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let mut session = sessions.remove(id).ok_or_else(|| not_found(id))?;
        session.generation += 1;
        session.cancel_oracle_task();
        info!(session_id = %id, "session removed");
        Ok(())
    }

    fn quiz_deadline(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from + chrono::Duration::seconds(*self.config.quiz_time_limit_secs() as i64)
    }

    /// Spawns the single deferred callback for the oracle's reply.
    #[instrument(skip(self))]
    fn schedule_oracle_reply(&self, id: SessionId, generation: u64, delay: Duration) {
        let manager = self.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            manager.apply_oracle_reply(&task_id, generation);
        });
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&id) {
            Some(session) => session.oracle_task = Some(handle.abort_handle()),
            // session torn down between the move and this lock
            None => handle.abort(),
        }
    }

    /// Applies the deferred oracle move unless the session was reset or
    /// torn down since it was scheduled.
    #[instrument(skip(self))]
    fn apply_oracle_reply(&self, id: &str, generation: u64) {
        let mut sessions = self.sessions.lock().unwrap();
        let Some(session) = sessions.get_mut(id) else {
            debug!(session_id = %id, "oracle reply for a removed session ignored");
            return;
        };
        if session.generation != generation {
            debug!(session_id = %id, "stale oracle reply ignored");
            return;
        }
        session.oracle_task = None;
        let ChallengeState::Board(judge) = &mut session.challenge else {
            return;
        };
        match judge.oracle_reply() {
            Ok(verdict) => {
                info!(session_id = %id, ?verdict, "oracle reply applied");
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "oracle reply skipped");
            }
        }
    }
}

fn not_found(id: &str) -> ApiError {
    warn!(session_id = %id, "session not found");
    ApiError::SessionNotFound { id: id.to_string() }
}

fn wrong_challenge(expected: ChallengeKind, id: &str, actual: ChallengeKind) -> ApiError {
    warn!(
        session_id = %id,
        %expected,
        %actual,
        "endpoint does not match the session's challenge"
    );
    ApiError::WrongChallenge { expected, actual }
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> SessionId {
    (0..SESSION_ID_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Wall-clock elapsed time scaled the way the animation clock runs.
fn scaled_elapsed_ms(started: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let wall_ms = (now - started).num_milliseconds().max(0) as u64;
    wall_ms * reflex::SPEED_MULTIPLIER
}

fn view_of(session: &VerifySession) -> SessionView {
    let challenge = match &session.challenge {
        ChallengeState::Board(judge) => ChallengeView::Board {
            size: judge.board().size(),
            squares: judge.board().squares().to_vec(),
            phase: judge.phase(),
            verified: judge.verified(),
            oracle_pending: judge.phase() == Phase::AwaitingOracle,
        },
        ChallengeState::Quiz { quiz, deadline } => ChallengeView::Quiz {
            stage: quiz.stage(),
            prompt: quiz.question().prompt,
            status: quiz.status(),
            feedback: quiz.feedback(),
            seconds_left: (*deadline - Utc::now()).num_seconds().max(0),
        },
        ChallengeState::Captcha(captcha) => ChallengeView::Captcha {
            text: captcha.value().to_string(),
        },
        ChallengeState::Reflex { game, .. } => ChallengeView::Reflex {
            radius: reflex::RADIUS,
            pattern_duration_ms: reflex::PATTERN_DURATION_MS,
            speed_multiplier: reflex::SPEED_MULTIPLIER,
            outcome: game.outcome(),
        },
    };
    SessionView {
        id: session.id.clone(),
        created_at: session.created_at,
        challenge,
    }
}
