//! Basic RAG flow: chunk a document, embed it with a toy embedder, persist the corpus, reload it
//! and answer a question.

use sift_core::{AnswerGenerator, EmbeddingModel, GroundedPrompt, Result};
use sift_rag::{Corpus, RagConfig, Strategy, embed_chunks};

const DOCUMENT: &str = "Retrieval-Augmented Generation uses embeddings to fetch context. \
    Chunking splits large files into passages for indexing! \
    A flat index compares the question with every stored passage. \
    Rust focuses on performance and safety using ownership and borrowing?";

#[derive(Clone)]
struct DemoEmbedder;

impl EmbeddingModel for DemoEmbedder {
    fn dim(&self) -> usize {
        4
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dim()];
        for (idx, byte) in text.bytes().enumerate() {
            let bucket = idx % self.dim();
            vector[bucket] += f32::from(byte);
        }
        Ok(vector)
    }
}

struct PromptPrinter;

impl AnswerGenerator for PromptPrinter {
    async fn generate(&self, query: &str, context: &str) -> Result {
        let prompt = GroundedPrompt::new(query, context);
        Ok(format!("[system]\n{}\n\n[user]\n{}", prompt.system(), prompt.user()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = tempfile::tempdir()?;
    let config = RagConfig::builder()
        .index_path(dir.path().join("vector_index.bin"))
        .metadata_path(dir.path().join("chunk_metadata.json"))
        .strategy(Strategy::Sentence)
        .chunk_size(120)
        .chunk_overlap(0)
        .top_k(2)
        .build()?;

    let chunks = config.chunker()?.chunk(DOCUMENT, Some("notes"));
    let records = embed_chunks(chunks, &DemoEmbedder).await?;
    Corpus::build(records)?.save_to(&config)?;

    let corpus = Corpus::load_from(&config)?;
    let question = "How do I prep documents for RAG?";
    let retrieval = corpus.query(question, config.top_k, &DemoEmbedder).await?;

    println!("Top matches:");
    for (rank, (chunk, distance)) in retrieval.chunks.iter().zip(&retrieval.distances).enumerate() {
        println!(
            "{rank}: chars {}..{} (distance = {distance:.1}) - {}",
            chunk.start_offset, chunk.end_offset, chunk.text
        );
    }

    let answer = corpus
        .answer(question, config.top_k, &DemoEmbedder, &PromptPrinter)
        .await?;
    println!("\n{}", answer.answer);

    Ok(())
}
