use anyhow::Ok;
use image::{ImageBuffer, Rgb, Rgba};
use lsb_veil::{
    cli::{DecodeArgs, EncodeArgs},
    handler::{handle_decode, handle_encode},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 RGBA 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于创建一个不带 alpha 通道的纯 RGB 测试图像
fn create_rgb_test_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("raw buffer matches dimensions");
    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于创建一个纯白图像（从未编码过的确定性输入）
fn create_white_image(path: &Path, width: u32, height: u32) {
    let img_buf = ImageBuffer::from_pixel(width, height, Rgb([255u8, 255, 255]));
    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证从嵌入到提取的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let cover_image_path = dir.path().join("cover.png");
    let encoded_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&cover_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_encode
    let encode_args = EncodeArgs {
        image: cover_image_path.clone(),
        message: None,
        text: Some(source_text_path.clone()),
        dest: Some(encoded_image_path.clone()),
        force: false,
    };
    handle_encode(encode_args)?;
    assert!(
        encoded_image_path.exists(),
        "Encoded image should be created."
    );

    // 3. 测试 handle_decode
    let decode_args = DecodeArgs {
        image: encoded_image_path.clone(),
        output: Some(recovered_text_path.clone()),
        force: false,
    };
    handle_decode(decode_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证不带 alpha 通道的 RGB 封面同样可以完成往返
#[test]
fn test_handle_encode_and_decode_rgb_cover() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let cover_image_path = dir.path().join("cover.png");
    let encoded_image_path = dir.path().join("hidden.png");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_rgb_test_image(&cover_image_path, 64, 64);
    let original_text = "RGB covers carry three samples per pixel.";

    // 2. 通过 --message 内联文本嵌入
    let encode_args = EncodeArgs {
        image: cover_image_path.clone(),
        message: Some(original_text.to_string()),
        text: None,
        dest: Some(encoded_image_path.clone()),
        force: false,
    };
    handle_encode(encode_args)?;

    // 3. 提取并验证
    let decode_args = DecodeArgs {
        image: encoded_image_path.clone(),
        output: Some(recovered_text_path.clone()),
        force: false,
    };
    handle_decode(decode_args)?;

    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_encode_and_decode_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let cover_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&cover_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_encode，不提供 dest 路径
    let encode_args = EncodeArgs {
        image: cover_image_path.clone(),
        message: None,
        text: Some(source_text_path.clone()),
        dest: None, // 关键：测试 None 的情况
        force: false,
    };
    handle_encode(encode_args)?;

    // 验证默认的编码图像文件是否已创建
    let expected_encoded_path = dir.path().join("encoded_original.png");
    assert!(
        expected_encoded_path.exists(),
        "Default encoded image should be created at: {:?}",
        expected_encoded_path
    );

    // 3. 测试 handle_decode，不提供 output 输出路径
    let decode_args = DecodeArgs {
        image: expected_encoded_path, // 使用上一步生成的默认文件
        output: None,                 // 关键：测试 None 的情况
        force: false,
    };
    handle_decode(decode_args)?;

    // 验证默认的恢复文本文件是否已创建
    let expected_recovered_path = dir.path().join("decoded_encoded_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 构建参数，不使用 --force
    let encode_args_no_force = EncodeArgs {
        image: image_path.clone(),
        message: None,
        text: Some(text_path.clone()),
        dest: Some(dest_path.clone()),
        force: false,
    };

    // 执行并断言操作会失败
    let result = handle_encode(encode_args_no_force);
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    // 构建参数，这次使用 --force
    let encode_args_with_force = EncodeArgs {
        image: image_path.clone(),
        message: None,
        text: Some(text_path.clone()),
        dest: Some(dest_path.clone()),
        force: true,
    };

    // 执行并断言操作会成功
    let result = handle_encode(encode_args_with_force);
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    // 创建一个非常小的图片
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文本
    let large_text = "a".repeat(5000);
    fs::write(&text_path, large_text)?;

    // 2. 执行并断言错误
    let encode_args = EncodeArgs {
        image: image_path,
        message: None,
        text: Some(text_path),
        dest: Some(dest_path.clone()),
        force: false,
    };
    let result = handle_encode(encode_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }

    // 失败的嵌入不应产生任何输出文件
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证空消息也能完成完整的往返
#[test]
fn test_handle_encode_empty_message() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.png");
    let dest_path = dir.path().join("hidden.png");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_image(&image_path, 10, 10);

    // 2. 嵌入空消息
    let encode_args = EncodeArgs {
        image: image_path.clone(),
        message: Some(String::new()),
        text: None,
        dest: Some(dest_path.clone()),
        force: false,
    };
    handle_encode(encode_args)?;

    // 3. 提取并验证结果为空
    let decode_args = DecodeArgs {
        image: dest_path,
        output: Some(recovered_path.clone()),
        force: false,
    };
    handle_decode(decode_args)?;

    let recovered = fs::read(&recovered_path)?;
    assert!(
        recovered.is_empty(),
        "An empty message must round-trip to an empty file."
    );

    Ok(())
}

/// 验证对从未编码过的图像执行 decode 会干净地失败
#[test]
fn test_handle_decode_untouched_image() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    let output_path = dir.path().join("message.txt");

    // 纯白图像的长度字段必然不可信
    create_white_image(&image_path, 32, 32);

    // 2. 执行并断言错误
    let decode_args = DecodeArgs {
        image: image_path,
        output: Some(output_path.clone()),
        force: false,
    };
    let result = handle_decode(decode_args);

    assert!(result.is_err(), "Decoding an untouched image should fail.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Failed to recover a message"));
    }

    // 失败的提取不应产生任何输出文件
    assert!(!output_path.exists());

    Ok(())
}

/// 验证对无法解码的文件执行 decode 会给出明确的错误
#[test]
fn test_handle_decode_invalid_image_file() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let bogus_path = dir.path().join("bogus.png");
    fs::write(&bogus_path, b"this is not an image at all")?;

    // 2. 执行并断言错误
    let decode_args = DecodeArgs {
        image: bogus_path,
        output: None,
        force: false,
    };
    let result = handle_decode(decode_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to decode image"));
    }

    Ok(())
}
