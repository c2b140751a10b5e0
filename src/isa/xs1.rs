use crate::bits::{bit, bit_range, primary_opcode};
use crate::decoder::{Decoded, Decoder};
use crate::error::{DecodeError, Field, Word};
use crate::instructions::Encoding::{self, *};
use crate::instructions::Mnemonic;
use crate::operands::{classify_long, classify_short, test_ru6};
use crate::words::Words;

type Entry = (&'static str, Encoding);

/// Two instructions told apart by a single bit; either side may be unused.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Split {
    pub(crate) clear: Option<Entry>,
    pub(crate) set: Option<Entry>,
}

impl Split {
    const NONE: Split = Split { clear: None, set: None };

    const fn pair(clear: Entry, set: Entry) -> Self {
        Self { clear: Some(clear), set: Some(set) }
    }

    const fn clear(entry: Entry) -> Self {
        Self { clear: Some(entry), set: None }
    }

    const fn set(entry: Entry) -> Self {
        Self { clear: None, set: Some(entry) }
    }

    fn is_empty(&self) -> bool {
        self.clear.is_none() && self.set.is_none()
    }

    fn pick(&self, bit: u16) -> Option<Entry> {
        if bit == 0 {
            self.clear
        } else {
            self.set
        }
    }
}

/// Opcodes whose instructions are told apart by operand count.
#[derive(Debug)]
pub(crate) struct RegisterForm {
    pub(crate) three: Entry,
    /// keyed on `bit(low, 4)`
    pub(crate) two: Split,
    /// keyed on `bit(low, 4)`
    pub(crate) one: Split,
    /// operandless instructions, keyed on the whole word
    pub(crate) zero: &'static [(u16, &'static str)],
}

/// ru6 opcodes where part of the register range is taken by u6 instructions.
#[derive(Debug)]
pub(crate) struct EscapeForm {
    /// keyed on bit 10, the branch direction
    pub(crate) branch: Split,
    /// keyed on bits 10..6
    pub(crate) escapes: &'static [(u16, &'static str)],
}

/// One secondary opcode under the extended-operand prefix.
#[derive(Debug)]
pub(crate) struct ExtendedForm {
    pub(crate) opcode: u8,
    pub(crate) six: Option<&'static str>,
    /// keyed on `bit(high, 4)`
    pub(crate) five: Split,
    /// keyed on `bits(high, 10..4)`
    pub(crate) four: &'static [(u16, &'static str)],
    /// keyed on `bits(high, 3..0)`
    pub(crate) three: &'static [(u16, Entry)],
    /// keyed on `bit(low, 4)` above `bits(high, 3..0)`
    pub(crate) two: &'static [(u16, &'static str)],
}

impl ExtendedForm {
    const EMPTY: ExtendedForm = ExtendedForm {
        opcode: 0,
        six: None,
        five: Split::NONE,
        four: &[],
        three: &[],
        two: &[],
    };
}

#[derive(Debug)]
pub(crate) enum Form {
    Register(RegisterForm),
    /// ru6 or u10: bit 10 picks one of two
    Immediate(Split),
    Escape(EscapeForm),
    /// first word of a prefixed long ru6/u6/u10 instruction
    Prefix,
    /// first word of a four to six operand instruction
    Extended(&'static [ExtendedForm]),
}

const fn register(
    three: Entry,
    two: Split,
    one: Split,
    zero: &'static [(u16, &'static str)],
) -> Form {
    Form::Register(RegisterForm { three, two, one, zero })
}

/// Indexed by primary opcode.
pub(crate) static OPCODES: [Form; 32] = [
    // 0x00
    register(
        ("STW", R2us),
        Split::pair(("TINITPC", R2), ("GETST", R2)),
        Split::pair(("EDU", R1), ("EEU", R1)),
        &[
            (0x07ec, "WAITEU"),
            (0x07ed, "CLRE"),
            (0x07ee, "SSYNC"),
            (0x07ef, "FREET"),
            (0x07fc, "DCALL"),
            (0x07fd, "KRET"),
            (0x07fe, "DRET"),
            (0x07ff, "SETKEP"),
        ],
    ),
    // 0x01
    register(
        ("LDW", R2us),
        Split::pair(("TINITDP", R2), ("OUTT", R2)),
        Split::pair(("WAITET", R1), ("WAITEF", R1)),
        &[
            (0x0fec, "LDSPC"),
            (0x0fed, "STSPC"),
            (0x0fee, "LDSSR"),
            (0x0fef, "STSSR"),
            (0x0ffc, "STSED"),
            (0x0ffd, "STET"),
            (0x0ffe, "GETED"),
            (0x0fff, "GETET"),
        ],
    ),
    // 0x02
    register(
        ("ADD", R3),
        Split::pair(("TINITSP", R2), ("SETD", R2)),
        Split::pair(("FREER", R1), ("MJOIN", R1)),
        &[
            (0x17ec, "DENTSP"),
            (0x17ed, "DRESTSP"),
            (0x17ee, "GETID"),
            (0x17ef, "GETKEP"),
            (0x17fc, "GETKSP"),
            (0x17fd, "LDSED"),
            (0x17fe, "LDET"),
        ],
    ),
    // 0x03
    register(
        ("SUB", R3),
        Split::pair(("TINITCP", R2), ("TSETMR", R2)),
        Split::pair(("TSTART", R1), ("MSYNC", R1)),
        &[],
    ),
    // 0x04
    register(
        ("SHL", R3),
        Split::set(("EET", R2)),
        Split::pair(("BLA", R1), ("BAU", R1)),
        &[],
    ),
    // 0x05
    register(
        ("SHR", R3),
        Split::pair(("ANDNOT", R2), ("EEF", R2)),
        Split::pair(("BRU", R1), ("SETSP", R1)),
        &[],
    ),
    // 0x06
    register(
        ("EQ", R3),
        Split::pair(("SEXT", R2), ("SEXT", Rus)),
        Split::pair(("SETDP", R1), ("SETCP", R1)),
        &[],
    ),
    // 0x07
    register(
        ("AND", R3),
        Split::pair(("GETTS", R2), ("SETPT", Rus)),
        Split::pair(("DGETREG", R1), ("SETEV", R1)),
        &[],
    ),
    // 0x08
    register(
        ("OR", R3),
        Split::pair(("ZEXT", R2), ("ZEXT", Rus)),
        Split::pair(("KCALL", R1), ("SETV", R1)),
        &[],
    ),
    // 0x09
    register(
        ("LDW", R3),
        Split::pair(("OUTCT", R2), ("OUTCT", Rus)),
        Split::pair(("ECALLF", R1), ("ECALLT", R1)),
        &[],
    ),
    // 0x0a
    Form::Immediate(Split::pair(("STWDP", Ru6), ("STWSP", Ru6))),
    // 0x0b
    Form::Immediate(Split::pair(("LDWDP", Ru6), ("LDWSP", Ru6))),
    // 0x0c
    Form::Immediate(Split::pair(("LDAWDP", Ru6), ("LDAWSP", Ru6))),
    // 0x0d
    Form::Immediate(Split::pair(("LDC", Ru6), ("LDWCP", Ru6))),
    // 0x0e
    Form::Escape(EscapeForm {
        branch: Split::pair(("BRFT", Ru6), ("BRBT", Ru6)),
        escapes: &[
            (0x0c, "BRFU"),
            (0x0d, "BLAT"),
            (0x0e, "EXTDP"),
            (0x0f, "KCALL"),
            (0x1c, "BRBU"),
            (0x1d, "ENTSP"),
            (0x1e, "EXTSP"),
            (0x1f, "RETSP"),
        ],
    }),
    // 0x0f
    Form::Escape(EscapeForm {
        branch: Split::pair(("BRFF", Ru6), ("BRBF", Ru6)),
        escapes: &[
            (0x0c, "CLRSR"),
            (0x0d, "SETSR"),
            (0x0e, "KENTSP"),
            (0x0f, "KRESTSP"),
            (0x1c, "GETSR"),
            (0x1d, "LDAWCP"),
        ],
    }),
    // 0x10
    register(
        ("LD16S", R3),
        Split::pair(("NOT", R2), ("INCT", R2)),
        Split::pair(("CLRPT", R1), ("SYNCR", R1)),
        &[],
    ),
    // 0x11
    register(
        ("LD8U", R3),
        Split::pair(("NOT", R2), ("INT", R2)),
        Split::NONE,
        &[],
    ),
    // 0x12
    register(
        ("ADD", R2us),
        Split::pair(("NEG", R2), ("ENDIN", R2)),
        Split::NONE,
        &[],
    ),
    // 0x13
    register(("SUB", R2us), Split::NONE, Split::NONE, &[]),
    // 0x14
    register(
        ("SHL", R2us),
        Split::pair(("MKMSK", R2), ("MKMSK", Rus)),
        Split::NONE,
        &[],
    ),
    // 0x15
    register(
        ("SHR", R2us),
        Split::pair(("OUT", R2), ("OUTSHR", R2)),
        Split::NONE,
        &[],
    ),
    // 0x16
    register(
        ("EQ", R2us),
        Split::pair(("IN", R2), ("INSHR", R2)),
        Split::NONE,
        &[],
    ),
    // 0x17
    register(
        ("TSETR", R3),
        Split::pair(("PEEK", R2), ("TESTCT", R2)),
        Split::NONE,
        &[],
    ),
    // 0x18
    register(
        ("LSS", R3),
        Split::pair(("SETPSC", R2), ("TESTWCT", R2)),
        Split::NONE,
        &[],
    ),
    // 0x19
    register(
        ("LSU", R3),
        Split::pair(("CHKCT", R2), ("CHKCT", Rus)),
        Split::NONE,
        &[],
    ),
    // 0x1a
    Form::Immediate(Split::pair(("BLRF", U10), ("BLRB", U10))),
    // 0x1b
    Form::Immediate(Split::pair(("LDAPF", U10), ("LDAPB", U10))),
    // 0x1c
    Form::Immediate(Split::pair(("BLACP", U10), ("LDWCPL", U10))),
    // 0x1d
    Form::Escape(EscapeForm {
        branch: Split::clear(("SETC", Ru6)),
        escapes: &[],
    }),
    // 0x1e
    Form::Prefix,
    // 0x1f
    Form::Extended(EXTENDED),
];

const EXTENDED: &[ExtendedForm] = &[
    ExtendedForm {
        opcode: 0x00,
        six: Some("LMUL"),
        five: Split::pair(("LDIVU", R5), ("LADD", R5)),
        four: &[(0x7e, "CRC8"), (0x7f, "MACCU")],
        three: &[(0x0c, ("STW", R3))],
        two: &[(0x0c, "BITREV"), (0x1c, "BYTEREV")],
    },
    ExtendedForm {
        opcode: 0x01,
        five: Split::set(("LSUB", R5)),
        four: &[(0x7e, "MACCS")],
        three: &[(0x0c, ("XOR", R3))],
        two: &[(0x0c, "CLZ"), (0x1c, "SETCLK")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x02,
        three: &[(0x0c, ("ASHR", R3))],
        two: &[(0x0c, "TINITLR"), (0x1c, "GETPS")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x03,
        three: &[(0x0c, ("LDAWF", R3))],
        two: &[(0x0c, "SETPS"), (0x1c, "GETD")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x04,
        three: &[(0x0c, ("LDAWB", R3))],
        two: &[(0x0c, "TESTLCL"), (0x1c, "SETTW")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x05,
        three: &[(0x0c, ("LDA16F", R3))],
        two: &[(0x0c, "SETRDY"), (0x1c, "SETC")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x06,
        three: &[(0x0c, ("LDA16B", R3))],
        two: &[(0x0c, "SETN"), (0x1c, "GETN")],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x07,
        three: &[(0x0c, ("MUL", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x08,
        three: &[(0x0c, ("DIVS", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x09,
        three: &[(0x0c, ("DIVU", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x10,
        three: &[(0x0c, ("ST16", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x11,
        three: &[(0x0c, ("ST8", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x12,
        three: &[
            (0x0c, ("ASHR", R2us)),
            (0x0d, ("OUTPW", R2us)),
            (0x0e, ("INPW", R2us)),
        ],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x13,
        three: &[(0x0c, ("LDAWF", R2us))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x14,
        three: &[(0x0c, ("LDAWB", R2us))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x15,
        three: &[(0x0c, ("CRC", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x18,
        three: &[(0x0c, ("REMS", R3))],
        ..ExtendedForm::EMPTY
    },
    ExtendedForm {
        opcode: 0x19,
        three: &[(0x0c, ("REMU", R3))],
        ..ExtendedForm::EMPTY
    },
];

fn lookup<T: Copy>(table: &[(u16, T)], key: u16) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// XMOS XS1 (XS1b) decoder.
///
/// Stateless; one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xs1Decoder;

impl Xs1Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Xs1Decoder {
    fn decode(&self, words: Words) -> Result<Decoded, DecodeError> {
        let walk = Walk { words, opcode: primary_opcode(words.low) };
        let mnemonic = walk.run().inspect_err(|err| {
            tracing::debug!(%words, opcode = walk.opcode, %err, "undecodable instruction");
        })?;
        Ok(Decoded { mnemonic, width: mnemonic.width() })
    }
}

/// One trip from an opcode's form down to a mnemonic.
struct Walk {
    words: Words,
    opcode: u8,
}

impl Walk {
    fn run(&self) -> Result<Mnemonic, DecodeError> {
        match &OPCODES[usize::from(self.opcode)] {
            Form::Register(form) => self.register(form),
            Form::Immediate(split) => self.immediate(split, Word::Low),
            Form::Escape(form) => self.escape(form, Word::Low),
            Form::Prefix => self.prefix(),
            Form::Extended(forms) => self.extended(forms),
        }
    }

    fn word(&self, which: Word) -> u16 {
        match which {
            Word::Low => self.words.low,
            // read only after high() has confirmed it is there
            Word::High => self.words.high.unwrap_or_default(),
        }
    }

    fn high(&self) -> Result<u16, DecodeError> {
        self.words.high.ok_or(DecodeError::MissingHighWord {
            words: self.words,
            opcode: self.opcode,
        })
    }

    fn invalid(&self, field: Field, value: u16) -> DecodeError {
        DecodeError::InvalidEncoding {
            words: self.words,
            opcode: self.opcode,
            field,
            value,
        }
    }

    /// Entry of `split` chosen by `bit(which, n)`. Reading from the high word
    /// always means the long form.
    fn pick(&self, split: &Split, which: Word, n: u8) -> Result<Mnemonic, DecodeError> {
        let value = bit(self.word(which), usize::from(n));
        split
            .pick(value)
            .map(|(name, encoding)| Mnemonic { name, encoding, long: which == Word::High })
            .ok_or_else(|| self.invalid(Field::Bit(which, n), value))
    }

    fn register(&self, form: &RegisterForm) -> Result<Mnemonic, DecodeError> {
        let low = self.words.low;
        let class = classify_short(low);
        match class {
            3 => Ok(Mnemonic::short(form.three.0, form.three.1)),
            2 | 1 => {
                let split = if class == 2 { &form.two } else { &form.one };
                if split.is_empty() {
                    return Err(self.invalid(Field::OperandClass, class.into()));
                }
                self.pick(split, Word::Low, 4)
            }
            _ if form.zero.is_empty() => Err(self.invalid(Field::OperandClass, class.into())),
            _ => lookup(form.zero, low)
                .map(|name| Mnemonic::short(name, R0))
                .ok_or_else(|| self.invalid(Field::Value(Word::Low), low)),
        }
    }

    fn immediate(&self, split: &Split, which: Word) -> Result<Mnemonic, DecodeError> {
        self.pick(split, which, 10)
    }

    fn escape(&self, form: &EscapeForm, which: Word) -> Result<Mnemonic, DecodeError> {
        let word = self.word(which);
        if test_ru6(word) {
            return self.pick(&form.branch, which, 10);
        }
        if form.escapes.is_empty() {
            return Err(self.invalid(Field::Range(which, 9, 6), bit_range(word, 9, 6)));
        }
        let selector = bit_range(word, 10, 6);
        lookup(form.escapes, selector)
            .map(|name| Mnemonic { name, encoding: U6, long: which == Word::High })
            .ok_or_else(|| self.invalid(Field::Range(which, 10, 6), selector))
    }

    /// Long ru6, u6 and u10 forms: the second word is decoded with the
    /// short-form rules of its own opcode.
    fn prefix(&self) -> Result<Mnemonic, DecodeError> {
        let marker = bit(self.words.low, 10);
        if marker != 0 {
            return Err(self.invalid(Field::Bit(Word::Low, 10), marker));
        }
        let high = self.high()?;
        let effective = primary_opcode(high);
        match &OPCODES[usize::from(effective)] {
            Form::Immediate(split) => self.immediate(split, Word::High),
            Form::Escape(form) => self.escape(form, Word::High),
            _ => Err(self.invalid(Field::Range(Word::High, 15, 11), effective.into())),
        }
    }

    fn extended(&self, forms: &[ExtendedForm]) -> Result<Mnemonic, DecodeError> {
        let low = self.words.low;
        let high = self.high()?;
        let secondary = primary_opcode(high);
        let form = forms
            .iter()
            .find(|form| form.opcode == secondary)
            .ok_or_else(|| self.invalid(Field::Range(Word::High, 15, 11), secondary.into()))?;
        let class = classify_long(low, high).ok_or_else(|| self.invalid(Field::LongOperandClass, 0))?;
        let no_class = || self.invalid(Field::LongOperandClass, class.into());

        match class {
            6 => form.six.map(|name| Mnemonic::long(name, R6)).ok_or_else(no_class),
            5 if form.five.is_empty() => Err(no_class()),
            5 => self.pick(&form.five, Word::High, 4),
            4 if form.four.is_empty() => Err(no_class()),
            4 => {
                let key = bit_range(high, 10, 4);
                lookup(form.four, key)
                    .map(|name| Mnemonic::long(name, R4))
                    .ok_or_else(|| self.invalid(Field::Range(Word::High, 10, 4), key))
            }
            3 if form.three.is_empty() => Err(no_class()),
            3 => {
                let key = bit_range(high, 3, 0);
                lookup(form.three, key)
                    .map(|(name, encoding)| Mnemonic::long(name, encoding))
                    .ok_or_else(|| self.invalid(Field::Range(Word::High, 3, 0), key))
            }
            2 if form.two.is_empty() => Err(no_class()),
            2 => {
                let key = (bit(low, 4) << 4) | bit_range(high, 3, 0);
                lookup(form.two, key)
                    .map(|name| Mnemonic::long(name, R2))
                    .ok_or_else(|| self.invalid(Field::Combined, key))
            }
            _ => Err(no_class()),
        }
    }
}
