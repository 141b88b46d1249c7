use fwobject::{
    Error,
    list::{self, List},
    };


#[test]
fn append_order() {
    let mut names = List::<&str, 8>::new();
    assert!(names.is_empty());
    assert!(names.head().is_none());
    assert!(list::payload(names.head()).is_none());

    for (index, name) in ["gpio", "uart", "motor", "can"].into_iter().enumerate() {
        assert_eq!(names.append(name), Ok(index));
    }
    assert_eq!(names.len(), 4);
    assert_eq!(names.iter().copied().collect::<Vec<_>>(), ["gpio", "uart", "motor", "can"]);

    // follow the forward links
    let mut visited = Vec::new();
    let mut node = names.head();
    while let Some(current) = node {
        visited.push((current.index(), *current.payload()));
        node = current.next();
    }
    assert_eq!(visited, [(0, "gpio"), (1, "uart"), (2, "motor"), (3, "can")]);
    assert_eq!(list::payload(names.head()), Some(&"gpio"));
}

#[test]
fn capacity() {
    let mut values = List::<u32, 3>::new();
    assert_eq!(values.capacity(), 3);
    for value in 0 .. 3 {
        values.append(value).unwrap();
    }
    assert_eq!(values.append(3), Err(Error::CapacityExceeded));
    assert_eq!(values.len(), 3);
    assert_eq!(values.get(2), Some(&2));
    assert_eq!(values.get(3), None);
}

#[test]
fn find_last() {
    let mut values = List::<(&str, u32), 8>::new();
    values.append(("speed", 1)).unwrap();
    values.append(("torque", 2)).unwrap();
    values.append(("speed", 3)).unwrap();

    assert_eq!(values.find_last(|(name, _)| *name == "speed"), Some((2, &("speed", 3))));
    assert_eq!(values.find_last(|(name, _)| *name == "torque"), Some((1, &("torque", 2))));
    assert_eq!(values.find_last(|(name, _)| *name == "current"), None);

    values.get_mut(1).unwrap().1 = 20;
    assert_eq!(values.get(1), Some(&("torque", 20)));
}
