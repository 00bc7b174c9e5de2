//! Tutor persona: the fixed instruction given to the model before any real
//! conversation content.
//!
//! The persona is injected as a synthetic two-turn prefix (an instruction
//! from the user side and a canned acknowledgement from the model side)
//! rather than a provider-specific system field, so every request carries
//! it in the same shape.
//!
//! `{name}` in the acknowledgement and greeting is replaced with the
//! student's display name.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

const NAME_PLACEHOLDER: &str = "{name}";

/// Static persona description. Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// How the tutor calls itself
    pub tutor_name: String,

    /// Who the tutor is teaching (grade level)
    pub audience: String,

    /// The only subject the tutor will discuss
    pub topic: String,

    /// Numbered strict rules, in order
    pub rules: Vec<String>,

    /// What the tutoring is for
    pub goal: String,

    /// Canned model-side reply closing the synthetic prefix
    pub acknowledgement: String,

    /// Opening message shown to the student when the session starts
    pub greeting: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            tutor_name: "Kak Gemmy".into(),
            audience: "siswa SD Kelas 6".into(),
            topic: "Pecahan (Fractions)".into(),
            rules: vec![
                "**DILARANG MEMBERIKAN JAWABAN AKHIR SECARA LANGSUNG.**".into(),
                "Gunakan metode \"Scaffolding\" (Bertingkat). Bimbing siswa langkah demi langkah.".into(),
                "Jika siswa bertanya soal (misal: \"1/2 + 1/3 berapa?\"), JAWABLAH dengan pertanyaan pancingan: \"Oke, yuk kita lihat penyebutnya (angka bawah). Angka 2 dan 3 sudah sama belum ya?\"".into(),
                "Hanya bahas soal pecahan. Jika siswa bertanya di luar topik, ajak kembali ke pecahan dengan ramah.".into(),
                "Gunakan bahasa percakapan yang sangat santai.".into(),
                "Sebutkan angka pecahan dengan huruf (contoh: tulis \"satu per dua\" jangan hanya \"1/2\").".into(),
            ],
            goal: "Menurunkan kecemasan siswa.".into(),
            acknowledgement: "Siap! Aku Kak Gemmy. Aku akan membimbing {name} belajar pecahan langkah demi langkah, dengan santai, tanpa memberi jawaban akhir secara langsung.".into(),
            greeting: "Halo {name}! Kak Gemmy siap bantu. Ada soal pecahan yang bikin kamu bingung?".into(),
        }
    }
}

impl PersonaConfig {
    /// Render the opening instruction for a given student.
    pub fn instruction(&self, student_name: &str) -> String {
        let mut text = String::new();
        text.push_str("PERAN:\n");
        text.push_str(&format!(
            "Kamu adalah \"{}\", tutor matematika pribadi untuk {}.\n",
            self.tutor_name, self.audience
        ));
        text.push_str(&format!("Siswa: {student_name}.\n"));
        text.push_str(&format!("Topik: {}.\n", self.topic));

        if !self.rules.is_empty() {
            text.push_str("\nATURAN WAJIB (STRICT RULES):\n");
            for (i, rule) in self.rules.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", i + 1, rule));
            }
        }

        if !self.goal.is_empty() {
            text.push_str("\nTUJUAN:\n");
            text.push_str(&self.goal);
            text.push('\n');
        }

        text
    }

    /// The synthetic two-turn prefix: instruction, then acknowledgement.
    pub fn prefix(&self, student_name: &str) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.instruction(student_name)),
            ChatMessage::model(self.acknowledgement.replace(NAME_PLACEHOLDER, student_name)),
        ]
    }

    /// Render the greeting shown once the student has entered a name.
    pub fn greeting(&self, student_name: &str) -> String {
        self.greeting.replace(NAME_PLACEHOLDER, student_name)
    }
}
