/// Resultado de conciliar la lista de archivos de una noticia editada.
#[derive(Debug, PartialEq, Eq)]
pub struct MediaDiff {
    /// Lo que queda: los conservados en su orden original, luego los nuevos.
    pub kept: Vec<String>,
    /// Lo que estaba antes y el cliente ya no quiere: se borra del disco.
    pub removed: Vec<String>,
}

/// Calcula qué archivos conservar y cuáles borrar al editar una noticia.
/// `keep` viene del cliente; solo cuenta su intersección con `current`,
/// así que nunca se borra nada que no estuviera ya en la base de datos.
pub fn reconcile(current: &[String], keep: &[String], new_uploads: &[String]) -> MediaDiff {
    let mut kept = Vec::with_capacity(current.len() + new_uploads.len());
    let mut removed = Vec::new();

    for path in current {
        if keep.iter().any(|k| k == path) {
            kept.push(path.clone());
        } else {
            removed.push(path.clone());
        }
    }
    kept.extend(new_uploads.iter().cloned());

    MediaDiff { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn conserva_el_orden_y_borra_lo_no_pedido() {
        let diff = reconcile(&paths(&["a", "b", "c"]), &paths(&["a", "c"]), &paths(&["d"]));
        assert_eq!(diff.kept, paths(&["a", "c", "d"]));
        assert_eq!(diff.removed, paths(&["b"]));
    }

    #[test]
    fn sin_lista_de_conservar_se_borra_todo() {
        let diff = reconcile(&paths(&["a", "b"]), &[], &[]);
        assert!(diff.kept.is_empty());
        assert_eq!(diff.removed, paths(&["a", "b"]));
    }

    #[test]
    fn rutas_desconocidas_en_keep_se_ignoran() {
        // El cliente no puede colar rutas que no estaban en la base de datos
        let diff = reconcile(&paths(&["a"]), &paths(&["a", "../etc/passwd"]), &[]);
        assert_eq!(diff.kept, paths(&["a"]));
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn los_nuevos_van_al_final() {
        let diff = reconcile(&paths(&["a", "b"]), &paths(&["b", "a"]), &paths(&["x", "y"]));
        // El orden de kept es el de current, no el de la lista del cliente
        assert_eq!(diff.kept, paths(&["a", "b", "x", "y"]));
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn sin_media_previa_solo_quedan_los_nuevos() {
        let diff = reconcile(&[], &paths(&["fantasma"]), &paths(&["n1"]));
        assert_eq!(diff.kept, paths(&["n1"]));
        assert!(diff.removed.is_empty());
    }
}
