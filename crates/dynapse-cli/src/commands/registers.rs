//! Configuration register listing

use clap::Args;
use serde::Serialize;

use dynapse_codec::registers::{module_by_name, ModuleInfo, MODULES};

use super::Context;
use crate::error::{CliError, CliResult};

/// List configuration modules and their parameters
#[derive(Args, Debug)]
pub struct RegistersCommand {
    /// Only show this module, e.g. SRAM
    pub module: Option<String>,
}

#[derive(Serialize)]
struct Param {
    name: &'static str,
    address: u8,
}

#[derive(Serialize)]
struct Module {
    name: &'static str,
    address: u8,
    params: Vec<Param>,
}

impl From<&ModuleInfo> for Module {
    fn from(info: &ModuleInfo) -> Self {
        Self {
            name: info.name,
            address: info.address,
            params: info
                .params
                .iter()
                .map(|&(name, address)| Param { name, address })
                .collect(),
        }
    }
}

impl RegistersCommand {
    pub fn execute(self, ctx: &Context) -> CliResult<()> {
        let modules: Vec<Module> = match &self.module {
            Some(name) => {
                let info = module_by_name(name)
                    .ok_or_else(|| CliError::invalid_args(format!("unknown module '{}'", name)))?;
                vec![Module::from(info)]
            }
            None => MODULES.iter().map(Module::from).collect(),
        };

        ctx.emit(&modules, || {
            let mut lines = Vec::new();
            for module in &modules {
                lines.push(format!("{:>2}  {}", module.address, module.name));
                for param in &module.params {
                    lines.push(format!("      {:>2}  {}", param.address, param.name));
                }
            }
            lines.join("\n")
        })
    }
}
