// Document container IO: the .docx archive and the XML tree of its body part
pub mod docx;
pub mod xml_tree;

#[cfg(test)]
pub(crate) mod test_support;
