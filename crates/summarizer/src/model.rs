use crate::backend::{StubBackend, SummarizationBackend};
use crate::bounds::OutputBounds;
use crate::error::{Result, SummarizerError};
use async_trait::async_trait;
use ndarray::{Array, Axis, Ix3};
use ort::execution_providers::{CPUExecutionProvider, ExecutionProvider, ExecutionProviderDispatch};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use ort::Error as OrtError;
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tokio::task::spawn_blocking;

const AVAILABLE_MODELS: &str = "bart-large-cnn, distilbart-cnn";

/// Which backend implementation serves summarization requests
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackendMode {
    /// ONNX Runtime seq2seq inference (the default)
    Onnx,
    /// Deterministic extractive stub, no model assets required
    Stub,
}

impl BackendMode {
    /// Parse a mode string
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "stub" => Ok(Self::Stub),
            other => Err(SummarizerError::InvalidMode(other.to_string())),
        }
    }

    /// Read the mode from `PRECIS_SUMMARIZER_MODE`
    pub fn from_env() -> Result<Self> {
        let raw = env::var("PRECIS_SUMMARIZER_MODE").unwrap_or_else(|_| "onnx".to_string());
        Self::parse(&raw)
    }
}

/// Construct the process-wide summarization backend from the environment.
///
/// Called once at startup; the result is injected into the pipeline and
/// reused across all requests. A failure here is fatal to the caller —
/// model loading is expensive and must not be deferred to request time.
pub fn backend_from_env() -> Result<Arc<dyn SummarizationBackend>> {
    match BackendMode::from_env()? {
        BackendMode::Stub => Ok(Arc::new(StubBackend)),
        BackendMode::Onnx => Ok(Arc::new(OnnxBackend::from_env()?)),
    }
}

/// Resolve the model asset directory.
///
/// `PRECIS_MODEL_DIR` wins; otherwise a `models/` directory is searched
/// upwards from the executable location, then from the current directory.
pub fn model_dir() -> PathBuf {
    if let Ok(path) = env::var("PRECIS_MODEL_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(found) = find_models_upwards(dir) {
                return found;
            }
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(found) = find_models_upwards(&cwd) {
            return found;
        }
    }

    PathBuf::from("models")
}

fn find_models_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join("models");
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ModelId(String);

impl Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ModelId {
    fn from_env() -> Self {
        let raw = env::var("PRECIS_MODEL").unwrap_or_else(|_| "bart-large-cnn".to_string());
        Self::normalize(&raw)
    }

    /// Accept upstream hub names alongside the short ids.
    fn normalize(raw: &str) -> Self {
        let name = raw.trim().to_ascii_lowercase();
        let id = match name.as_str() {
            "facebook/bart-large-cnn" => "bart-large-cnn".to_string(),
            "sshleifer/distilbart-cnn-12-6" | "distilbart-cnn-12-6" => "distilbart-cnn".to_string(),
            other => other.to_string(),
        };
        Self(id)
    }

    fn spec(&self) -> Result<ModelSpec> {
        match self.0.as_str() {
            // BART-family CNN/DailyMail checkpoints share the tokenizer and
            // the special-token layout; generation starts from EOS with the
            // first real token forced to BOS.
            "bart-large-cnn" | "distilbart-cnn" => Ok(ModelSpec {
                id: self.clone(),
                max_input_tokens: 1024,
                decoder_start_token_id: 2,
                forced_bos_token_id: Some(0),
                eos_token_id: 2,
            }),
            other => Err(SummarizerError::UnknownModel {
                requested: other.to_string(),
                available: AVAILABLE_MODELS.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
struct ModelSpec {
    id: ModelId,
    max_input_tokens: usize,
    decoder_start_token_id: u32,
    forced_bos_token_id: Option<u32>,
    eos_token_id: u32,
}

impl ModelSpec {
    fn assets_in(&self, model_dir: &Path) -> ModelAssets {
        let dir = model_dir.join(self.id.to_string());
        ModelAssets {
            encoder_path: dir.join("encoder_model.onnx"),
            decoder_path: dir.join("decoder_model.onnx"),
            tokenizer_path: dir.join("tokenizer.json"),
        }
    }
}

struct ModelAssets {
    encoder_path: PathBuf,
    decoder_path: PathBuf,
    tokenizer_path: PathBuf,
}

struct Seq2SeqSessions {
    encoder: Session,
    decoder: Session,
}

/// Seq2seq summarization over ONNX Runtime.
///
/// One encoder pass per chunk, then greedy decoder steps until the
/// end-of-sequence token or the max output bound. End-of-sequence is
/// suppressed until the min bound is reached. Sessions are mutex-guarded;
/// a whole generation holds the lock, so concurrent callers serialize.
pub struct OnnxBackend {
    inner: Arc<OnnxInner>,
}

struct OnnxInner {
    sessions: Mutex<Seq2SeqSessions>,
    tokenizer: Tokenizer,
    spec: ModelSpec,
}

impl OnnxBackend {
    /// Load the model named by `PRECIS_MODEL` from the resolved model dir
    pub fn from_env() -> Result<Self> {
        let spec = ModelId::from_env().spec()?;
        Self::load(spec, &model_dir())
    }

    fn load(spec: ModelSpec, model_dir: &Path) -> Result<Self> {
        // Tokenization parallelism buys nothing for one-document requests
        // and fights the decode loop for cores.
        if !tokenizers::utils::parallelism::is_parallelism_configured() {
            tokenizers::utils::parallelism::set_parallelism(false);
        }

        let assets = spec.assets_in(model_dir);
        if !assets.encoder_path.exists()
            || !assets.decoder_path.exists()
            || !assets.tokenizer_path.exists()
        {
            return Err(SummarizerError::Model(format!(
                "Model files for '{}' are missing. Expected encoder at {}, decoder at {}, tokenizer at {}. Set PRECIS_MODEL_DIR to a directory holding the exported model.",
                spec.id,
                assets.encoder_path.display(),
                assets.decoder_path.display(),
                assets.tokenizer_path.display(),
            )));
        }

        let mut tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| SummarizerError::Model(format!("Tokenizer load failed: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: spec.max_input_tokens,
                ..TruncationParams::default()
            }))
            .map_err(|e| SummarizerError::Model(format!("Tokenizer truncation failed: {e}")))?;

        let encoder = build_session(&assets.encoder_path)?;
        let decoder = build_session(&assets.decoder_path)?;

        log::info!(
            "Loaded ONNX model '{}' (max input {} tokens)",
            spec.id,
            spec.max_input_tokens
        );

        Ok(Self {
            inner: Arc::new(OnnxInner {
                sessions: Mutex::new(Seq2SeqSessions { encoder, decoder }),
                tokenizer,
                spec,
            }),
        })
    }
}

#[async_trait]
impl SummarizationBackend for OnnxBackend {
    async fn summarize(&self, text: &str, bounds: OutputBounds) -> Result<String> {
        let inner = self.inner.clone();
        let owned = text.to_string();
        spawn_blocking(move || inner.generate_blocking(&owned, bounds))
            .await
            .map_err(|e| SummarizerError::Model(format!("Join error: {e}")))?
    }
}

impl OnnxInner {
    fn generate_blocking(&self, text: &str, bounds: OutputBounds) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| SummarizerError::Model(format!("Tokenization failed: {e}")))?;
        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        if input_ids.is_empty() {
            return Err(SummarizerError::model("Tokenizer produced no input ids"));
        }
        let seq_len = input_ids.len();

        let ids_array = Array::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| SummarizerError::Model(format!("IDs shape error: {e}")))?;
        let mask_array = Array::from_shape_vec((1, seq_len), vec![1i64; seq_len])
            .map_err(|e| SummarizerError::Model(format!("Mask shape error: {e}")))?;

        let ids_tensor = Tensor::from_array(ids_array.into_dyn())
            .map_err(|e| to_model_error(&e))?
            .upcast();
        let mask_tensor = Tensor::from_array(mask_array.into_dyn())
            .map_err(|e| to_model_error(&e))?
            .upcast();

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| SummarizerError::model("Failed to lock ONNX sessions"))?;
        let Seq2SeqSessions { encoder, decoder } = &mut *sessions;

        // Encoder runs once; its hidden states feed every decoder step.
        let hidden = {
            let mut available: HashMap<String, DynTensor> = HashMap::new();
            available.insert("input_ids".to_string(), ids_tensor);
            available.insert("attention_mask".to_string(), mask_tensor.clone());
            run_to_array(encoder, &available, "encoder")?
        };

        let eos = self.spec.eos_token_id;
        let mut generated: Vec<u32> = vec![self.spec.decoder_start_token_id];

        while generated.len() - 1 < bounds.max_tokens {
            let produced = generated.len() - 1;

            let next = match (produced, self.spec.forced_bos_token_id) {
                (0, Some(bos)) => bos,
                _ => {
                    let step_ids: Vec<i64> = generated.iter().map(|&id| i64::from(id)).collect();
                    let dec_array = Array::from_shape_vec((1, generated.len()), step_ids)
                        .map_err(|e| SummarizerError::Model(format!("IDs shape error: {e}")))?;
                    let dec_tensor = Tensor::from_array(dec_array.into_dyn())
                        .map_err(|e| to_model_error(&e))?
                        .upcast();
                    let hidden_tensor = Tensor::from_array(hidden.clone())
                        .map_err(|e| to_model_error(&e))?
                        .upcast();

                    let mut available: HashMap<String, DynTensor> = HashMap::new();
                    available.insert("input_ids".to_string(), dec_tensor);
                    available.insert("encoder_hidden_states".to_string(), hidden_tensor);
                    available.insert("encoder_attention_mask".to_string(), mask_tensor.clone());

                    let logits = run_to_array(decoder, &available, "decoder")?;
                    let suppressed = (produced < bounds.min_tokens).then_some(eos);
                    argmax_last_step(&logits, suppressed)?
                }
            };

            if next == eos {
                break;
            }
            generated.push(next);
        }

        drop(sessions);

        let output_ids = generated[1..].to_vec();
        if output_ids.is_empty() {
            return Err(SummarizerError::model("Decoder produced no tokens"));
        }
        let summary = self
            .tokenizer
            .decode(&output_ids, true)
            .map_err(|e| SummarizerError::Model(format!("Detokenization failed: {e}")))?;
        Ok(summary.trim().to_string())
    }
}

fn run_to_array(
    session: &mut Session,
    available: &HashMap<String, DynTensor>,
    label: &str,
) -> Result<ndarray::ArrayD<f32>> {
    let mut feed: HashMap<String, DynTensor> = HashMap::new();
    for input in &session.inputs {
        let key = input.name.clone();
        let Some(value) = available.get(&key) else {
            return Err(SummarizerError::Model(format!(
                "Unsupported ONNX {label} input '{key}'"
            )));
        };
        feed.insert(key, value.clone());
    }

    let outputs = session
        .run(SessionInputs::from(feed))
        .map_err(|e| SummarizerError::Model(format!("ONNX {label} forward failed: {e}")))?;
    if outputs.len() == 0 {
        return Err(SummarizerError::Model(format!(
            "ONNX {label} returned no outputs"
        )));
    }

    let array = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| SummarizerError::Model(format!("Failed to decode ONNX {label} output: {e}")))?
        .to_owned();
    Ok(array)
}

/// Greedy pick over the last decode step of `[1, steps, vocab]` logits.
fn argmax_last_step(logits: &ndarray::ArrayD<f32>, suppressed: Option<u32>) -> Result<u32> {
    let logits = logits
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|e| SummarizerError::Model(format!("Bad decoder output shape: {e}")))?;
    let steps = logits.len_of(Axis(1));
    if steps == 0 {
        return Err(SummarizerError::model("Decoder produced no logit steps"));
    }

    let batch = logits.index_axis(Axis(0), 0);
    let step = batch.index_axis(Axis(0), steps - 1);

    let mut best_id: Option<usize> = None;
    let mut best_score = f32::NEG_INFINITY;
    for (id, &score) in step.iter().enumerate() {
        if suppressed.is_some_and(|s| s as usize == id) {
            continue;
        }
        if best_id.is_none() || score > best_score {
            best_score = score;
            best_id = Some(id);
        }
    }

    let id = best_id.ok_or_else(|| SummarizerError::model("Decoder produced empty logits"))?;
    u32::try_from(id).map_err(|_| SummarizerError::model("Vocabulary index out of range"))
}

fn build_session(path: &Path) -> Result<Session> {
    let (intra_threads, inter_threads) = default_ort_threads();
    Session::builder()
        .map_err(|e| to_model_error(&e))?
        .with_intra_threads(intra_threads)
        .map_err(|e| SummarizerError::Model(format!("Failed to set ORT intra threads: {e}")))?
        .with_inter_threads(inter_threads)
        .map_err(|e| SummarizerError::Model(format!("Failed to set ORT inter threads: {e}")))?
        .with_intra_op_spinning(false)
        .map_err(|e| SummarizerError::Model(format!("Failed to set ORT intra spinning: {e}")))?
        .with_inter_op_spinning(false)
        .map_err(|e| SummarizerError::Model(format!("Failed to set ORT inter spinning: {e}")))?
        .with_execution_providers(build_execution_providers())
        .map_err(|e| SummarizerError::Model(format!("Failed to register execution provider: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| SummarizerError::Model(format!("Failed to set optimization level: {e}")))?
        .commit_from_file(path)
        .map_err(|e| SummarizerError::Model(format!("Failed to load ONNX model: {e}")))
}

fn build_execution_providers() -> Vec<ExecutionProviderDispatch> {
    // CPU provider only; GPU wiring is a deployment concern.
    vec![CPUExecutionProvider::default().build()]
}

fn default_ort_threads() -> (usize, usize) {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    // Decode loops issue many short session runs; keep fan-out modest so a
    // busy service stays responsive.
    let intra_threads = if cpus <= 4 {
        1
    } else if cpus <= 12 {
        2
    } else {
        4
    };

    (intra_threads, 1)
}

fn to_model_error(err: &OrtError) -> SummarizerError {
    SummarizerError::Model(format!("{err}"))
}
