/*
 * @Date         : 2026-10-16
 * @Description  : 参数保存/加载单元测试
 */

use std::io::Cursor;

use super::one_to_sixteen;
use crate::assert_err;
use crate::nn::{
    Conv2d, Conv2dTranspose, MaxPool2d, Module, NnError, Sequential, load_variables,
    save_variables,
};
use crate::tensor::Padding;

fn build_model(seed: u64) -> Result<Sequential, NnError> {
    Ok(Sequential::new()
        .with(Conv2d::new_seeded(1, 3, (3, 3), (1, 1), Padding::Same, seed)?)
        .with(MaxPool2d::new((2, 2), (2, 2), Padding::Valid)?)
        .with(Conv2dTranspose::new_seeded(
            3,
            1,
            (4, 4),
            (2, 2),
            (2, 2),
            Padding::Valid,
            seed + 1,
        )?))
}

#[test]
fn test_save_and_load_variables() -> Result<(), NnError> {
    let source = build_model(1)?;
    let mut target = build_model(2)?;
    assert_ne!(source, target);

    let mut buffer = Vec::new();
    save_variables(&source, &mut buffer)?;
    load_variables(&mut target, Cursor::new(buffer))?;

    assert_eq!(source, target);
    let x = one_to_sixteen();
    assert_eq!(source.train_fprop(&x)?, target.train_fprop(&x)?);
    Ok(())
}

#[test]
fn test_load_variables_count_mismatch() -> Result<(), NnError> {
    let conv = Conv2d::new_seeded(1, 3, (3, 3), (1, 1), Padding::Same, 1)?;
    let mut buffer = Vec::new();
    save_variables(&conv, &mut buffer)?;

    let mut model = build_model(2)?;
    let before = model.clone();
    assert_err!(
        load_variables(&mut model, Cursor::new(buffer)),
        NnError::ParamCountMismatch { expected: 4, got: 2 }
    );
    assert_eq!(model, before);
    Ok(())
}

#[test]
fn test_load_variables_shape_mismatch() -> Result<(), NnError> {
    let source = Conv2d::new_seeded(1, 3, (3, 3), (1, 1), Padding::Same, 1)?;
    let mut target = Conv2d::new_seeded(1, 3, (5, 5), (1, 1), Padding::Same, 1)?;
    let before = target.clone();

    let mut buffer = Vec::new();
    save_variables(&source, &mut buffer)?;
    assert_err!(
        load_variables(&mut target, Cursor::new(buffer)),
        NnError::ParamShapeMismatch { index: 0, expected, got }
            if expected == &vec![5, 5, 1, 3] && got == &vec![3, 3, 1, 3]
    );
    assert_eq!(target, before);
    Ok(())
}

#[test]
fn test_load_variables_corrupted() -> Result<(), NnError> {
    let mut model = build_model(1)?;
    assert_err!(
        load_variables(&mut model, Cursor::new(vec![1u8, 2, 3])),
        NnError::Bincode(_)
    );
    Ok(())
}

#[test]
fn test_sequential_save_and_load() -> Result<(), NnError> {
    let dir = tempfile::tempdir()?;
    let model = build_model(7)?;
    model.save(dir.path(), "tiny")?;
    assert!(dir.path().join("tiny.json").exists());
    assert!(dir.path().join("tiny.bin").exists());

    let loaded = Sequential::load(dir.path(), "tiny")?;
    assert_eq!(loaded, model);
    Ok(())
}

#[test]
fn test_sequential_load_without_params_file() -> Result<(), NnError> {
    let dir = tempfile::tempdir()?;
    build_model(7)?.describe("bare").save(dir.path().join("bare.json"))?;
    assert_err!(
        Sequential::load(dir.path(), "bare"),
        NnError::InvalidConfig(msg) if msg.contains("params_file")
    );
    Ok(())
}

#[test]
fn test_sequential_save_failure_leaves_no_descriptor() -> Result<(), NnError> {
    let dir = tempfile::tempdir()?;
    // 参数文件路径被目录占用，无法写入
    std::fs::create_dir(dir.path().join("tiny.bin"))?;
    assert_err!(build_model(7)?.save(dir.path(), "tiny"), NnError::Io(_));
    assert!(!dir.path().join("tiny.json").exists());
    Ok(())
}
