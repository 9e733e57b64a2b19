// 终端交互界面
//
// 把操作员的输入转成表单控制器的命令调用，并展示结果。
// 每个动作产生的错误都在动作内部提示，不会中断会话。

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::clipboard_manager;
use crate::form::{FormController, OpenFolderOutcome};

/// 单独一行输入该标记表示粘贴结束
pub const PASTE_END_MARKER: &str = "END";

/// 剪贴板读取函数
pub type ClipboardReader = fn() -> Result<Option<String>>;

pub struct Shell<R, W> {
    input: R,
    output: W,
    form: FormController,
    clipboard: ClipboardReader,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, form: FormController) -> Self {
        Self {
            input,
            output,
            form,
            clipboard: clipboard_manager::read_clipboard_text,
        }
    }

    /// 替换剪贴板来源
    pub fn with_clipboard(mut self, reader: ClipboardReader) -> Self {
        self.clipboard = reader;
        self
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 主循环，直到用户选择退出或输入结束
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "=== 码上放心追溯码批量处理工具 ===")?;

        loop {
            self.print_menu()?;
            let Some(choice) = read_line(&mut self.input)? else {
                break;
            };

            match choice.trim() {
                "1" => self.enter_company()?,
                "2" => self.paste_codes()?,
                "3" => self.paste_from_clipboard()?,
                "4" => self.choose_output_dir()?,
                "5" => self.generate()?,
                "6" => self.reset()?,
                "7" => self.open_folder()?,
                "0" | "q" => break,
                "" => continue,
                other => writeln!(self.output, "未知选项: {}", other)?,
            }
        }

        writeln!(self.output, "再见")?;
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let code_lines = self
            .form
            .codes_text()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();

        writeln!(self.output)?;
        writeln!(self.output, "企业/医院名称: {}", self.form.company_name())?;
        writeln!(self.output, "存储路径: {}", self.form.output_dir().display())?;
        writeln!(self.output, "已粘贴: {} 行", code_lines)?;
        writeln!(self.output, "状态: {}", self.form.status())?;
        writeln!(self.output, "----------------------------------")?;
        writeln!(self.output, "1. 输入企业/医院名称")?;
        writeln!(self.output, "2. 粘贴追溯码")?;
        writeln!(self.output, "3. 从剪贴板读取追溯码")?;
        writeln!(self.output, "4. 选择存储路径")?;
        writeln!(self.output, "5. 生成表格")?;
        writeln!(self.output, "6. 重置")?;
        writeln!(self.output, "7. 打开文件夹")?;
        writeln!(self.output, "0. 退出")?;
        write!(self.output, "> ")?;
        self.output.flush()
    }

    fn enter_company(&mut self) -> Result<()> {
        write!(self.output, "请输入企业或医院名称: ")?;
        self.output.flush()?;
        if let Some(line) = read_line(&mut self.input)? {
            self.form.set_company_name(line.trim());
        }
        Ok(())
    }

    fn paste_codes(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "请粘贴追溯码（每行一个），单独一行输入 {} 结束:",
            PASTE_END_MARKER
        )?;
        self.output.flush()?;

        let mut pasted = String::new();
        while let Some(line) = read_line(&mut self.input)? {
            if line.trim() == PASTE_END_MARKER {
                break;
            }
            pasted.push_str(&line);
            pasted.push('\n');
        }

        self.form.append_codes_text(&pasted);
        Ok(())
    }

    fn paste_from_clipboard(&mut self) -> Result<()> {
        match (self.clipboard)() {
            Ok(Some(text)) => {
                let lines = text.lines().filter(|l| !l.trim().is_empty()).count();
                self.form.append_codes_text(&text);
                writeln!(self.output, "✓ 已从剪贴板读取 {} 行", lines)?;
            }
            Ok(None) => writeln!(self.output, "⚠ 警告: 剪贴板中没有文本")?,
            Err(e) => {
                tracing::warn!("读取剪贴板失败: {}", e);
                writeln!(self.output, "❌ 错误: 读取剪贴板失败：{}", e)?;
            }
        }
        Ok(())
    }

    fn choose_output_dir(&mut self) -> Result<()> {
        write!(self.output, "请输入存储文件夹（留空保持不变）: ")?;
        self.output.flush()?;

        let Some(line) = read_line(&mut self.input)? else {
            return Ok(());
        };
        let dir = line.trim();
        if dir.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.form.choose_output_dir(PathBuf::from(dir)) {
            tracing::error!("保存存储路径失败: {:#}", e);
            writeln!(self.output, "❌ 错误: 保存设置失败：{:#}", e)?;
        }
        Ok(())
    }

    fn generate(&mut self) -> Result<()> {
        let report = match self.form.generate() {
            Ok(report) => report,
            Err(e) if e.is_validation() => {
                writeln!(self.output, "⚠ 警告: {}", e)?;
                return Ok(());
            }
            Err(e) => {
                writeln!(self.output, "❌ 错误: 生成表格时出错：{}", e)?;
                return Ok(());
            }
        };

        writeln!(self.output, "✓ {}", report.status_line())?;
        if report.nonstandard_count > 0 {
            writeln!(
                self.output,
                "⚠ 提示: 有 {} 条追溯码不是 20 位数字，已原样导出",
                report.nonstandard_count
            )?;
        }

        let prompt = format!(
            "表格已生成！\n文件: {}\n\n是否清空当前输入，继续处理下一个企业？",
            report.file_name
        );
        if confirm(&mut self.input, &mut self.output, &prompt)? {
            self.form.reset();
        } else {
            writeln!(self.output, "文件已保存，您可以继续添加其他企业的数据。")?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.form.reset();
        writeln!(self.output, "✓ 已重置")?;
        Ok(())
    }

    fn open_folder(&mut self) -> Result<()> {
        let Shell {
            input,
            output,
            form,
            ..
        } = self;

        let result = form.open_folder(|dir: &Path| {
            let prompt = format!("存储路径不存在，将创建: {}\n是否继续？", dir.display());
            confirm_or_decline(&mut *input, &mut *output, &prompt)
        });

        match result {
            Ok(OpenFolderOutcome::Opened) | Ok(OpenFolderOutcome::CreatedAndOpened) => {
                writeln!(output, "✓ 已打开: {}", form.output_dir().display())?
            }
            Ok(OpenFolderOutcome::Declined) => writeln!(output, "已取消")?,
            Err(e) => writeln!(output, "⚠ 警告: {}", e)?,
        }
        Ok(())
    }
}

/// 读取一行，去掉行尾换行；输入结束时返回 None
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

/// 是/否确认，直接回车视为 "是"，输入结束视为 "否"
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    write!(output, "{} [Y/n]: ", prompt)?;
    output.flush()?;

    let Some(answer) = read_line(input)? else {
        return Ok(false);
    };
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "" | "y" | "yes" | "是"))
}

/// 确认失败（读写终端出错）时记录日志并按 "否" 处理
fn confirm_or_decline<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> bool {
    match confirm(input, output, prompt) {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("读取确认输入失败，按取消处理: {}", e);
            false
        }
    }
}
