//! Deterministic prompt assembly for the chat completion call.
//!
//! The instruction block pins the persona (Japanese bodybuilding expert)
//! and the grounding policy: answer only from the supplied context, never
//! from outside knowledge. Assembly is literal substitution; no
//! conditional logic.

/// Separator line placed before and after the context block.
pub const SEPARATOR: &str = "-------------------------";

/// Builds the single system prompt from the retrieved context and the
/// latest user message.
///
/// `doc_context` may be empty (empty collection, failed retrieval of
/// nothing); the template shape is identical either way.
pub fn build_prompt(doc_context: &str, latest_message: &str) -> String {
    format!(
        "あなたは日本のボディビルダーについて詳しいです。\n\
         コンテキストで受け取った情報を元に、日本のボディビルダーについて質問を答えることができます。\n\
         これらのコンテキストは最近のWikipediaページから抽出されました。\n\
         もしない情報がある場合はあなたの情報を使わないでください。\n\
         レスポンスに画像を含めても構いません。\n\
         {SEPARATOR}\n\
         {doc_context}\n\
         {SEPARATOR}\n\
         Questions: {latest_message}"
    )
}
