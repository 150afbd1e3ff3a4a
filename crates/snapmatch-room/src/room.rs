//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Joins, guesses, and timer expiries are all
//! processed one at a time in arrival order — that serialization is the
//! exactly-once guarantee for round resolution, with no locks involved.

use snapmatch_protocol::{
    ClientMessage, PlayerId, Recipient, RoomCode, RoomSnapshot, ServerMessage,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{GameConfig, Round, RoomError, RoomPhase};
use crate::round::GuessOutcome;

/// Maximum participants in a normal room. Solo rooms cap at one.
const MAX_PLAYERS: usize = 2;

/// Channel sender for delivering outbound events to one participant.
///
/// Unbounded on purpose: broadcast is fire-and-forget relative to state
/// mutation, so a slow socket can never block the actor.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Identity assigned to a participant when their join is accepted.
#[derive(Debug, Clone)]
pub struct JoinedPlayer {
    pub player_id: PlayerId,
    pub player_name: String,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: RoomPhase,
    pub player_count: usize,
    pub capacity: usize,
    pub solo_mode: bool,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a participant; replies with their assigned identity.
    Join {
        sender: PlayerSender,
        reply: oneshot::Sender<Result<JoinedPlayer, RoomError>>,
    },

    /// Remove a participant; replies with the remaining count so the
    /// caller can tell the registry when the room is empty.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<usize>,
    },

    /// Deliver a client command from a participant.
    Message {
        sender: PlayerId,
        msg: ClientMessage,
    },

    /// Request the current room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone — the registry holds
/// one per room, and each connection task holds one for its room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Requests to join the room, registering an outbound event channel.
    pub async fn join(
        &self,
        sender: PlayerSender,
    ) -> Result<JoinedPlayer, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Removes a participant. Returns how many remain.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Forwards a client command to the room (fire-and-forget).
    pub async fn send(
        &self,
        sender: PlayerId,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Message { sender, msg })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down. Already-stopped rooms are fine.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(RoomCommand::Shutdown).await;
    }
}

// ---------------------------------------------------------------------------
// Actor internals
// ---------------------------------------------------------------------------

/// The single pending timer for a room.
///
/// A room never has an expiry and an intermission pending at once, so one
/// slot is enough — and overwriting the slot on early resolution *is* the
/// timer cancellation, atomic with the state change that caused it.
enum Timer {
    Idle,
    /// The current round expires at `at`; `round` guards against a stale
    /// fire racing a just-resolved or replaced round.
    RoundExpiry { round: u64, at: Instant },
    /// Pause between a resolved round and the automatic next one.
    NextRound { at: Instant },
}

impl Timer {
    fn deadline(&self) -> Option<Instant> {
        match self {
            Self::Idle => None,
            Self::RoundExpiry { at, .. } | Self::NextRound { at } => Some(*at),
        }
    }
}

struct Player {
    id: PlayerId,
    name: String,
    score: u32,
    sender: PlayerSender,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    solo_mode: bool,
    phase: RoomPhase,
    config: GameConfig,
    /// Participants in join order.
    players: Vec<Player>,
    next_player_id: u64,
    round_counter: u64,
    round: Option<Round>,
    timer: Timer,
    receiver: mpsc::Receiver<RoomCommand>,
}

/// Sleeps until `deadline`, or pends forever when there is none so the
/// actor's `select!` only ever wakes on commands.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl RoomActor {
    /// Runs the actor loop, processing commands and timers until the room
    /// ends or is shut down.
    async fn run(mut self) {
        tracing::info!(room = %self.code, solo = self.solo_mode, "room actor started");

        loop {
            let deadline = self.timer.deadline();
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(RoomCommand::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = wait_until(deadline) => self.handle_timer(),
            }
            if self.phase == RoomPhase::Ended {
                break;
            }
        }

        tracing::info!(room = %self.code, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { sender, reply } => {
                let result = self.handle_join(sender);
                let _ = reply.send(result);
            }
            RoomCommand::Leave { player_id, reply } => {
                let remaining = self.handle_leave(player_id);
                let _ = reply.send(remaining);
            }
            RoomCommand::Message { sender, msg } => {
                self.handle_message(sender, msg);
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown => unreachable!("handled in run loop"),
        }
    }

    fn capacity(&self) -> usize {
        if self.solo_mode { 1 } else { MAX_PLAYERS }
    }

    fn handle_join(
        &mut self,
        sender: PlayerSender,
    ) -> Result<JoinedPlayer, RoomError> {
        if self.players.len() >= self.capacity() {
            return Err(RoomError::Full(self.code.clone()));
        }
        if !self.phase.is_joinable() {
            return Err(RoomError::AlreadyStarted(self.code.clone()));
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        let name = if self.solo_mode {
            "Solo Player".to_string()
        } else {
            format!("Player {}", self.players.len() + 1)
        };
        self.players.push(Player {
            id,
            name: name.clone(),
            score: 0,
            sender,
        });

        tracing::info!(
            room = %self.code,
            player = %id,
            players = self.players.len(),
            "player joined"
        );

        // Event order matches the lifecycle the clients expect: ack the
        // joiner, tell the others, then refresh the joiner's state.
        self.send_to(
            id,
            ServerMessage::Connected {
                player_id: id,
                player_name: name.clone(),
                room_code: self.code.clone(),
            },
        );
        let state = self.snapshot();
        self.dispatch(vec![
            (
                Recipient::AllExcept(id),
                ServerMessage::PlayerJoined {
                    state: state.clone(),
                },
            ),
            (Recipient::Player(id), ServerMessage::StateUpdate { state }),
        ]);

        if self.players.len() == self.capacity() {
            self.phase = RoomPhase::Ready;
            if self.solo_mode {
                self.send_to(
                    id,
                    ServerMessage::RoomReady {
                        message: "Ready to play solo! Send start_game.".into(),
                    },
                );
            } else {
                self.broadcast(ServerMessage::RoomFull {
                    message: "Both players connected! Ready to start.".into(),
                });
            }
        }

        Ok(JoinedPlayer {
            player_id: id,
            player_name: name,
        })
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> usize {
        let Some(pos) = self.players.iter().position(|p| p.id == player_id)
        else {
            return self.players.len();
        };
        self.players.remove(pos);

        tracing::info!(
            room = %self.code,
            player = %player_id,
            players = self.players.len(),
            "player left"
        );

        if self.players.is_empty() {
            self.phase = RoomPhase::Ended;
            self.timer = Timer::Idle;
            return 0;
        }

        // A leaver before the game starts reopens the room; during play
        // the remaining participant keeps playing.
        if self.phase == RoomPhase::Ready {
            self.phase = RoomPhase::Lobby;
        }

        let state = self.snapshot();
        self.broadcast(ServerMessage::PlayerLeft { player_id, state });
        self.players.len()
    }

    fn handle_message(&mut self, sender: PlayerId, msg: ClientMessage) {
        if !self.players.iter().any(|p| p.id == sender) {
            tracing::warn!(
                room = %self.code,
                player = %sender,
                "message from non-member, ignoring"
            );
            return;
        }

        match msg {
            ClientMessage::StartGame => self.handle_start(sender),
            ClientMessage::Guess { guess } => self.handle_guess(sender, &guess),
            ClientMessage::Ping => self.send_to(sender, ServerMessage::Pong),
        }
    }

    fn handle_start(&mut self, sender: PlayerId) {
        if !self.phase.can_start() {
            tracing::debug!(
                room = %self.code,
                player = %sender,
                phase = %self.phase,
                "start_game ignored"
            );
            return;
        }
        self.phase = RoomPhase::Playing;
        if self.start_round() {
            tracing::info!(room = %self.code, "game started");
            self.broadcast(ServerMessage::GameStarted {
                state: self.snapshot(),
            });
        }
    }

    fn handle_guess(&mut self, sender: PlayerId, guess: &str) {
        if self.phase != RoomPhase::Playing {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };

        match round.evaluate(sender, guess) {
            GuessOutcome::Win => {
                // Swapping the timer slot cancels the expiry atomically
                // with the resolution that just happened.
                self.timer = Timer::NextRound {
                    at: Instant::now() + self.config.intermission,
                };
                let matched = round.match_symbol().to_string();
                let name = self
                    .players
                    .iter_mut()
                    .find(|p| p.id == sender)
                    .map(|p| {
                        p.score += 1;
                        p.name.clone()
                    })
                    .unwrap_or_default();

                tracing::info!(
                    room = %self.code,
                    player = %sender,
                    %matched,
                    "match found"
                );
                self.broadcast(ServerMessage::MatchFound {
                    state: self.snapshot(),
                    player_id: sender,
                    player_name: name,
                    r#match: matched,
                    solo_mode: self.solo_mode,
                });
            }
            GuessOutcome::Wrong => self.send_to(
                sender,
                ServerMessage::WrongGuess {
                    message: "That's not the match! Keep looking.".into(),
                },
            ),
            GuessOutcome::Late => self.send_to(
                sender,
                ServerMessage::WrongGuess {
                    message: "Too late — this round is already over.".into(),
                },
            ),
            GuessOutcome::Empty => {}
        }
    }

    fn handle_timer(&mut self) {
        match std::mem::replace(&mut self.timer, Timer::Idle) {
            Timer::RoundExpiry { round, .. } => {
                // Round-identity check: a stale fire against a resolved or
                // replaced round must be a no-op.
                let current = match &self.round {
                    Some(r) => r.index() == round && !r.resolved(),
                    None => false,
                };
                if !current {
                    return;
                }

                tracing::debug!(room = %self.code, round, "round expired");
                self.broadcast(ServerMessage::RoundExpired {
                    message: "Time's up! Starting a new round.".into(),
                    state: self.snapshot(),
                });
                if self.start_round() {
                    self.broadcast(ServerMessage::NewRound {
                        state: self.snapshot(),
                    });
                }
            }
            Timer::NextRound { .. } => {
                if self.phase == RoomPhase::Playing && self.start_round() {
                    self.broadcast(ServerMessage::NewRound {
                        state: self.snapshot(),
                    });
                }
            }
            Timer::Idle => {}
        }
    }

    /// Starts the next round and arms its expiry timer. Returns `false`
    /// on a configuration failure, which ends the room — the registry
    /// validates the catalog at startup, so this is a safety net only.
    fn start_round(&mut self) -> bool {
        self.round_counter += 1;
        let seats: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        match Round::start(self.round_counter, &self.config, seats) {
            Ok(round) => {
                self.timer = Timer::RoundExpiry {
                    round: round.index(),
                    at: round.expires_at(),
                };
                self.round = Some(round);
                true
            }
            Err(e) => {
                tracing::error!(
                    room = %self.code,
                    error = %e,
                    "round generation failed, closing room"
                );
                self.broadcast(ServerMessage::Error {
                    message: "server configuration error, room closed".into(),
                });
                self.phase = RoomPhase::Ended;
                false
            }
        }
    }

    /// Builds the post-mutation state snapshot. Called inside the actor
    /// right after the mutation it describes, so it is never stale.
    fn snapshot(&self) -> RoomSnapshot {
        let mut snapshot = RoomSnapshot {
            room_code: self.code.clone(),
            is_full: self.players.len() >= self.capacity(),
            game_started: self.phase == RoomPhase::Playing,
            solo_mode: self.solo_mode,
            round_deadline: self.round.as_ref().map(Round::deadline_unix_ms),
            round_duration: self.config.round_duration.as_secs(),
            ..RoomSnapshot::default()
        };
        for p in &self.players {
            snapshot.players.insert(p.id, p.name.clone());
            snapshot.scores.insert(p.id, p.score);
            if let Some(view) =
                self.round.as_ref().and_then(|r| r.card_view(p.id))
            {
                snapshot.cards.insert(p.id, view);
            }
        }
        snapshot
    }

    /// Delivers outbound events to their recipients.
    fn dispatch(&self, msgs: Vec<(Recipient, ServerMessage)>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for p in &self.players {
                        let _ = p.sender.send(msg.clone());
                    }
                }
                Recipient::Player(pid) => self.send_to(pid, msg),
                Recipient::AllExcept(excluded) => {
                    for p in &self.players {
                        if p.id != excluded {
                            let _ = p.sender.send(msg.clone());
                        }
                    }
                }
            }
        }
    }

    fn broadcast(&self, msg: ServerMessage) {
        self.dispatch(vec![(Recipient::All, msg)]);
    }

    /// Sends an event to a single participant. Silently drops if the
    /// receiver is gone (connection already closed).
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(p) = self.players.iter().find(|p| p.id == player_id) {
            let _ = p.sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            phase: self.phase,
            player_count: self.players.len(),
            capacity: self.capacity(),
            solo_mode: self.solo_mode,
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with
/// it. `channel_size` bounds the command queue — senders wait when full.
pub fn spawn_room(
    code: RoomCode,
    solo_mode: bool,
    config: GameConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        code: code.clone(),
        solo_mode,
        phase: RoomPhase::Lobby,
        config,
        players: Vec::new(),
        next_player_id: 1,
        round_counter: 0,
        round: None,
        timer: Timer::Idle,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
