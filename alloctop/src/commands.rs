//! One handler per CLI action
//!
//! Every handler converts transport failures into printed text at the point
//! of the control call; nothing propagates past the requested action and
//! the process exit status stays 0 either way. The user-facing strings are
//! the established diagnose-tools wording and must not be reworded.

use std::io;

use alloctop_common::{AllocTopSettings, DUMP_BUF_LEN, FEATURE_NAME};
use log::{debug, warn};

use crate::export::{LogTarget, SlsExporter};
use crate::params::Params;
use crate::poll::PollLoop;
use crate::record::{extract_variant_buffer, AllocRecord};
use crate::render::{settings_json, TableRenderer};
use crate::transport::{ActivateOutcome, ActivationRegistry, DeactivateOutcome, Transport};

/// Build the settings to write for `--activate`. A non-positive `top`
/// defaults to 20; `verbose` passes through.
pub fn build_settings(arg: &str) -> AllocTopSettings {
    let params = Params::parse(arg);
    #[allow(clippy::cast_possible_truncation)]
    let mut top = params.int_value("top") as i32;
    if top <= 0 {
        top = 20;
    }
    #[allow(clippy::cast_possible_truncation)]
    let verbose = params.int_value("verbose") as i32;
    AllocTopSettings { activated: 0, top, verbose }
}

/// `--activate`: write settings, then register the feature name.
///
/// A registry failure after a successful write leaves the sampler
/// configured but not active; both outcomes are reported, nothing is rolled
/// back.
pub fn activate(transport: &dyn Transport, registry: &dyn ActivationRegistry, arg: &str) {
    let settings = build_settings(arg);
    let ret = match transport.set_settings(&settings) {
        Ok(()) => 0,
        Err(err) => err.status(),
    };

    println!("功能设置{}，返回值：{ret}", if ret == 0 { "成功" } else { "失败" });
    println!("    TOP-N：{}", settings.top);
    println!("    输出级别：{}", settings.verbose);

    if ret != 0 {
        return;
    }

    match registry.activate(FEATURE_NAME) {
        ActivateOutcome::Activated => println!("alloc-top activated"),
        ActivateOutcome::NotActivated { status } => {
            println!("alloc-top is not activated, ret {status}");
        }
    }
}

/// `--deactivate`: unregister the feature name. Routed through the registry
/// in both transport modes.
pub fn deactivate(registry: &dyn ActivationRegistry) {
    match registry.deactivate(FEATURE_NAME) {
        DeactivateOutcome::Deactivated => println!("alloc-top is not activated"),
        DeactivateOutcome::Failed { status } => {
            println!("deactivate alloc-top fail, ret is {status}");
        }
    }
}

/// `--settings`: read and print the sampler configuration, as text or as a
/// JSON document when the option string carries `json=1`.
pub fn settings(transport: &dyn Transport, arg: &str) {
    let params = Params::parse(arg);
    let enable_json = params.int_value("json") == 1;

    let (settings, ret) = match transport.settings() {
        Ok(settings) => (settings, 0),
        Err(err) => (AllocTopSettings::default(), err.status()),
    };

    if enable_json {
        // serde_json::Value pretty-prints through the alternate formatter
        println!("{:#}", settings_json(&settings, ret));
        return;
    }

    if ret == 0 {
        println!("功能设置：");
        println!("    是否激活：{}", if settings.activated != 0 { "√" } else { "×" });
        println!("    TOP-N：{}", settings.top);
        println!("    输出级别：{}", settings.verbose);
    } else {
        println!("获取alloc-top设置失败，请确保正确安装了diagnose-tools工具");
    }
}

/// `--report`: one-shot dump rendered as a fixed-width table. A failed dump
/// prints nothing, matching the established behavior.
pub fn report(transport: &dyn Transport) {
    let mut buf = vec![0u8; DUMP_BUF_LEN];
    match transport.dump(&mut buf) {
        Ok(len) => {
            let stdout = io::stdout();
            let mut table = TableRenderer::new(stdout.lock());
            extract_variant_buffer(&buf, len, |chunk| {
                if let Some(record) = AllocRecord::from_chunk(chunk) {
                    if let Err(err) = table.render(&record) {
                        warn!("failed to write table row: {err}");
                    }
                }
                0
            });
        }
        Err(err) => debug!("dump failed: {err}"),
    }
}

/// `--log`: run the continuous exporter against the configured sinks. An
/// option string configuring no sink at all does nothing.
pub async fn log(transport: Box<dyn Transport>, arg: &str) {
    let Some(target) = LogTarget::parse(arg) else {
        debug!("--log configured no sink, nothing to run");
        return;
    };
    let exporter = SlsExporter::from_target(&target);
    PollLoop::new(transport, exporter).run().await;
}
