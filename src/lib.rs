pub mod batch;
pub mod bits;
pub mod decoder;
pub mod error;
pub mod instructions;
pub mod operands;
pub mod words;

pub mod isa {
    pub mod xs1; // XS1b, as found on XCore XS1-G and XS1-L parts
}

pub use batch::{decode_batch, decode_batch_strict, decode_tokens};
pub use decoder::{decode, decode_token, Decoded, Decoder};
pub use error::{DecodeError, Field, Word};
pub use instructions::{Encoding, Mnemonic};
pub use isa::xs1::Xs1Decoder;
pub use words::{Width, Words};
