//! Supported reply languages and their localized strings.

use serde::Serialize;

use super::types::TextDirection;

/// Codes accepted in chat requests.
pub const SUPPORTED_CODES: [&str; 3] = ["en", "ar", "ckb"];

/// A reply language.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Language {
    /// English.
    #[default]
    English,
    /// Arabic.
    Arabic,
    /// Central Kurdish (Sorani).
    Kurdish,
}

/// Localized strings and layout for one language.
#[derive(Debug)]
pub struct LanguageProfile {
    /// ISO-style code (`en`, `ar`, `ckb`).
    pub code: &'static str,
    /// Native display name.
    pub name: &'static str,
    /// Text direction.
    pub direction: TextDirection,
    /// Opening line of a fallback reply.
    pub fallback_preamble: &'static str,
    /// Closing line of a fallback reply.
    pub fallback_closing: &'static str,
    /// Instruction sent to the generation provider.
    pub system_prompt: &'static str,
}

const ENGLISH: LanguageProfile = LanguageProfile {
    code: "en",
    name: "English",
    direction: TextDirection::Ltr,
    fallback_preamble: "I can't reach my AI assistant right now, but here is a quote that might inspire you:",
    fallback_closing: "Feel free to ask me anything else!",
    system_prompt: "You are a friendly assistant for a collection of inspirational quotes. \
        Answer thoughtfully and concisely, and weave in relevant quotes when they help. \
        Always reply in English.",
};

const ARABIC: LanguageProfile = LanguageProfile {
    code: "ar",
    name: "العربية",
    direction: TextDirection::Rtl,
    fallback_preamble: "لا أستطيع الوصول إلى المساعد الذكي الآن، ولكن إليك اقتباسًا قد يلهمك:",
    fallback_closing: "لا تتردد في سؤالي عن أي شيء آخر!",
    system_prompt: "أنت مساعد ودود لمجموعة من الاقتباسات الملهمة. \
        أجب بعناية وإيجاز، واستشهد باقتباسات مناسبة عندما تفيد. \
        أجب دائمًا باللغة العربية.",
};

const KURDISH: LanguageProfile = LanguageProfile {
    code: "ckb",
    name: "کوردی",
    direction: TextDirection::Rtl,
    fallback_preamble: "ئێستا ناتوانم بگەمە یاریدەدەری زیرەک، بەڵام ئەمە وتەیەکە کە لەوانەیە ئیلهامت پێ بدات:",
    fallback_closing: "بە ئازادی هەر پرسیارێکی ترت هەیە لێم بپرسە!",
    system_prompt: "تۆ یاریدەدەرێکی دۆستانەیت بۆ کۆمەڵەیەک وتەی ئیلهامبەخش. \
        بە وردی و کورتی وەڵام بدەرەوە، و لە کاتی پێویستدا وتەی گونجاو بهێنەرەوە. \
        هەمیشە بە زمانی کوردی وەڵام بدەرەوە.",
};

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Self; 3] = [Self::English, Self::Arabic, Self::Kurdish];

    /// Parse an exact language code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Resolve a requested code, defaulting to English.
    #[must_use]
    pub fn resolve(code: Option<&str>) -> Self {
        code.and_then(Self::from_code).unwrap_or_default()
    }

    /// Language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.profile().code
    }

    /// Localized strings for this language.
    #[must_use]
    pub const fn profile(self) -> &'static LanguageProfile {
        match self {
            Self::English => &ENGLISH,
            Self::Arabic => &ARABIC,
            Self::Kurdish => &KURDISH,
        }
    }
}

/// Public summary of a language for clients.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LanguageInfo {
    /// Language code.
    pub code: &'static str,
    /// Native display name.
    pub name: &'static str,
    /// Text direction.
    pub direction: TextDirection,
}

/// List every supported language.
#[must_use]
pub fn languages() -> Vec<LanguageInfo> {
    Language::ALL
        .iter()
        .map(|lang| {
            let profile = lang.profile();
            LanguageInfo {
                code: profile.code,
                name: profile.name,
                direction: profile.direction,
            }
        })
        .collect()
}
