//! Sentence pooling over BERT token states.
use anyhow::{Result, bail, ensure};
use candle_core::{D, Tensor};

const FLOOR: f64 = 1e-12;

/// Average the token states the attention mask keeps, then scale each row to
/// unit length. `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; the
/// result is `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let &[batch, tokens, width] = hidden.dims() else {
        bail!("token states must be [batch, tokens, hidden], got {:?}", hidden.dims());
    };
    ensure!(
        attention_mask.dims() == [batch, tokens],
        "attention mask {:?} does not match token states {:?}",
        attention_mask.dims(),
        hidden.dims()
    );

    let weights = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let summed = hidden.broadcast_mul(&weights.unsqueeze(D::Minus1)?)?.sum(1)?;
    // Floors keep fully masked rows and zero vectors finite.
    let kept = (weights.sum_keepdim(1)? + FLOOR)?;
    let mean = summed.broadcast_div(&kept)?;
    let norm = (mean.sqr()?.sum_keepdim(1)?.sqrt()? + FLOOR)?;
    let pooled = mean.broadcast_div(&norm)?;
    ensure!(pooled.dims() == [batch, width], "pooled shape {:?}, expected [{batch}, {width}]", pooled.dims());
    Ok(pooled)
}
