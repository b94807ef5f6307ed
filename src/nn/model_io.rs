/*
 * @Date         : 2026-10-16
 * @Description  : 模型参数的保存与加载（bincode）
 *
 * 参数按`Module::variables()`的顺序整体写入；加载时个数与每个形状都必须一致，
 * 任一不符则不修改模型。
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use super::{Module, ModelDescriptor, NnError, Sequential};
use crate::tensor::Tensor;

/// 将模块的全部参数写入`writer`
pub fn save_variables<M: Module + ?Sized, W: Write>(module: &M, writer: W) -> Result<(), NnError> {
    let variables = module.variables();
    bincode::serialize_into(writer, &variables)?;
    debug!(count = variables.len(), "参数已保存");
    Ok(())
}

/// 从`reader`读回参数并写入模块
pub fn load_variables<M: Module + ?Sized, R: Read>(
    module: &mut M,
    reader: R,
) -> Result<(), NnError> {
    let loaded: Vec<Tensor> = bincode::deserialize_from(reader)?;
    let mut targets = module.variables_mut();
    if loaded.len() != targets.len() {
        return Err(NnError::ParamCountMismatch {
            expected: targets.len(),
            got: loaded.len(),
        });
    }
    if let Some((index, (target, source))) = targets
        .iter()
        .zip(&loaded)
        .enumerate()
        .find(|(_, (target, source))| !target.is_same_shape(source))
    {
        return Err(NnError::ParamShapeMismatch {
            index,
            expected: target.shape().to_vec(),
            got: source.shape().to_vec(),
        });
    }

    let count = loaded.len();
    for (target, source) in targets.iter_mut().zip(loaded) {
        **target = source;
    }
    debug!(count, "参数已加载");
    Ok(())
}

impl Sequential {
    /// 保存完整模型：`<dir>/<name>.json`（结构）与`<dir>/<name>.bin`（参数）
    pub fn save(&self, dir: impl AsRef<Path>, name: &str) -> Result<(), NnError> {
        let dir = dir.as_ref();
        let params_file = format!("{name}.bin");

        // 先写参数，描述文件只在参数写完后出现
        let mut writer = BufWriter::new(File::create(dir.join(&params_file))?);
        save_variables(self, &mut writer)?;
        writer.flush()?;

        let mut descriptor = self.describe(name);
        descriptor.params_file = Some(params_file);
        descriptor.save(dir.join(format!("{name}.json")))?;
        debug!(dir = %dir.display(), name, "模型已保存");
        Ok(())
    }

    /// 加载由`save`保存的完整模型
    pub fn load(dir: impl AsRef<Path>, name: &str) -> Result<Self, NnError> {
        let dir = dir.as_ref();
        let descriptor = ModelDescriptor::load(dir.join(format!("{name}.json")))?;
        let params_file = descriptor.params_file.as_deref().ok_or_else(|| {
            NnError::InvalidConfig(format!("模型描述`{name}.json`缺少 params_file 字段"))
        })?;

        // 随机初始化的权重随即被覆盖，种子无关紧要
        let mut model = Sequential::from_descriptor(&descriptor, 0)?;
        let reader = BufReader::new(File::open(dir.join(params_file))?);
        load_variables(&mut model, reader)?;
        debug!(dir = %dir.display(), name, layers = model.len(), "模型已加载");
        Ok(model)
    }
}
