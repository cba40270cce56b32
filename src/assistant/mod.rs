pub mod filler;
pub mod voice;

pub use filler::{ChatTurn, FillState, FillerReply, FormFiller, Sender, GREETING};
pub use voice::{apply_voice_input, Language, SpeechSource, TranscriptReader, VoiceIntake};
