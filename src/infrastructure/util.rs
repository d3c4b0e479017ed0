use crate::application::ports::util::CodeGenerator;
use crate::domain::activation::{CodeFormat, CodeValue};
use rand::{Rng, RngCore, rngs::OsRng};

/// Generates activation codes from the operating system RNG.
#[derive(Debug, Default, Clone)]
pub struct RandomCodeGenerator {
    format: CodeFormat,
}

impl RandomCodeGenerator {
    pub fn new(format: CodeFormat) -> Self {
        Self { format }
    }

    fn grouped_hex() -> String {
        let mut bytes = [0u8; CodeFormat::GROUPED_HEX_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let digits = hex::encode_upper(bytes);
        format!("{}-{}-{}", &digits[0..4], &digits[4..8], &digits[8..12])
    }

    fn alphanumeric() -> String {
        let charset = CodeFormat::ALPHANUMERIC_CHARSET;
        (0..CodeFormat::ALPHANUMERIC_LENGTH)
            .map(|_| char::from(charset[OsRng.gen_range(0..charset.len())]))
            .collect()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> CodeValue {
        let raw = match self.format {
            CodeFormat::GroupedHex => Self::grouped_hex(),
            CodeFormat::Alphanumeric => Self::alphanumeric(),
        };
        CodeValue::from_trusted(raw)
    }
}
