/// Masked hint for an answer: the first character followed by one underscore
/// per remaining character ("Hello" -> "H____").
///
/// Characters are counted as Unicode scalar values.
pub fn get_hint(answer: &str) -> String {
  let mut chars = answer.chars();
  match chars.next() {
    Some(first) => {
      let mut hint = String::with_capacity(answer.len());
      hint.push(first);
      hint.extend(chars.map(|_| '_'));
      hint
    }
    None => String::new(),
  }
}
