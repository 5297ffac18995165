use console::Style;
use minic_core::{MachineCode, Op};

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub offset: usize,
    pub text: String,
    /// Offset the instruction transfers control to, when it does.
    pub target: Option<Result<usize, String>>,
}

/// Resolve every instruction of `code` into a listing row.
pub fn listing(code: &MachineCode) -> Vec<ListingLine> {
    let labels = code.label_offsets();
    code.ops
        .iter()
        .enumerate()
        .map(|(offset, op)| {
            let target = op.target_label().map(|label| labels.get(&label).copied().ok_or(label));
            ListingLine { offset, text: op.to_string(), target }
        })
        .collect()
}

/// Render `code` as a numbered listing. Labels are highlighted and jumps and
/// calls carry the offset they resolve to (or `unresolved`).
pub fn disassemble(code: &MachineCode, styled: bool) -> String {
    let label_style = Style::new().yellow().bold().force_styling(styled);
    let comment_style = Style::new().dim().force_styling(styled);
    let missing_style = Style::new().red().force_styling(styled);

    let width = code.len().saturating_sub(1).to_string().len().max(4);
    let mut out = String::new();
    for (line, op) in listing(code).into_iter().zip(&code.ops) {
        let text = match op {
            Op::Label { .. } => label_style.apply_to(&line.text).to_string(),
            Op::Comment { .. } => comment_style.apply_to(&line.text).to_string(),
            _ => line.text.clone(),
        };
        out.push_str(&format!("{:0width$}  {}", line.offset, text, width = width));
        match &line.target {
            Some(Ok(at)) => out.push_str(&format!("    ; -> {:0width$}", at, width = width)),
            Some(Err(label)) => {
                out.push_str(&format!("    ; {}", missing_style.apply_to(format!("unresolved {}", label))))
            }
            None => {}
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jumps_and_calls_show_their_targets() {
        let code = MachineCode::from_text(
            "JMP L_skip_0\nLABEL FUNC_f\nRET 1\nLABEL L_skip_0\nCALL f, 0\nJZ x, nowhere\n",
        )
        .expect("load");
        let text = disassemble(&code, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "0000  JMP L_skip_0    ; -> 0003");
        assert_eq!(lines[1], "0001  LABEL FUNC_f");
        assert_eq!(lines[4], "0004  CALL f, 0    ; -> 0001");
        assert_eq!(lines[5], "0005  JZ x, nowhere    ; unresolved nowhere");
    }

    #[test]
    fn listing_keeps_comments_in_place() {
        let code = MachineCode::from_text("// func main()\nLABEL FUNC_main\n").expect("load");
        let rows = listing(&code);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "// func main()");
        assert_eq!(rows[0].target, None);
    }
}
