//! Construction of the outbound completion payload.
//!
//! The payload is always: one system message carrying the persona, the most
//! recent [`CONTEXT_WINDOW`] messages of history, and the new user turn.

use crate::types::{ChatCompletionRequest, Message, Model, Region};

/// Number of prior messages forwarded to the model.
///
/// This is a message count, not a token budget. The cut ignores role pairing,
/// so an assistant reply may be forwarded without the question that prompted it.
pub const CONTEXT_WINDOW: usize = 6;

/// Persona instructions for Teman Wisata.
pub const SYSTEM_PROMPT: &str = "Kamu adalah Teman Wisata, asisten perjalanan yang ramah, seru, dan sangat tahu tentang wisata serta budaya Indonesia.
Tugasmu adalah:
1. Berikan informasi tentang budaya, tradisi, kuliner khas daerah di Indonesia
2. Rekomendasikan tempat wisata kuliner dan atraksi budaya
3. Bagikan cerita rakyat atau sejarah lokal yang menarik
4. Berikan tips untuk pengunjung (etika, pakaian, waktu terbaik berkunjung)
5. Jelaskan makna di balik tradisi atau makanan khas

**Aturan respons:**
- Selalu awali dengan salam ramah dalam bahasa Indonesia
- Gunakan bahasa yang santai dan informatif
- Struktur jawaban dengan: pengantar singkat, konten utama, tips tambahan
- Jika tidak tahu, jangan mengarang - minta maaf dan arahkan ke topik terkait
- Sertakan 1-2 fakta unik yang jarang diketahui

Format jawaban:
[Judul/Topik]

[Isi penjelasan dengan poin-poin atau paragraf singkat]

Tips & Info:
• [Tips pertama]
• [Tips kedua]
• [Fakta unik]

[Pertanyaan pengantar untuk melanjutkan percakapan]

Contoh topik yang bisa dibahas:
- Rendang Padang dan filosofinya
- Upacara Ngaben di Bali
- Wayang Kulit Jawa
- Rumah Adat Toraja
- Batik dan makna motifnya
- Kue tradisional daerah
- Festival budaya lokal
- Alat musik tradisional
- Mitos dan legenda daerah";

/// Applies the regional focus tag to the text that will be sent upstream.
pub fn tag_user_text(new_user_text: &str, region: Option<&Region>) -> String {
    match region {
        Some(region) => format!("{} {new_user_text}", region.tag()),
        None => new_user_text.to_string(),
    }
}

/// Returns the tail of `history` that fits in the context window.
pub fn context_window(history: &[Message]) -> &[Message] {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    &history[start..]
}

/// Builds the outbound message list for one completion.
pub fn build_messages(
    history: &[Message],
    new_user_text: &str,
    region: Option<&Region>,
) -> Vec<Message> {
    let window = context_window(history);
    let mut messages = Vec::with_capacity(window.len() + 2);
    messages.push(Message::system(SYSTEM_PROMPT));
    messages.extend(window.iter().cloned());
    messages.push(Message::user(tag_user_text(new_user_text, region)));
    messages
}

/// Builds the full request body for one completion.
pub fn build_request(
    history: &[Message],
    new_user_text: &str,
    region: Option<&Region>,
    model: &Model,
) -> ChatCompletionRequest {
    ChatCompletionRequest::new(model.clone(), build_messages(history, new_user_text, region))
}
